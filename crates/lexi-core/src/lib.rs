pub mod bookmarks;
pub mod error;
pub mod language;
pub mod listing;
pub mod memory;
pub mod preprocess;
pub mod search;
pub mod session;
