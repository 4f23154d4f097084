mod auth;
mod bookmarks;
mod client;

pub use auth::SupabaseAuth;
pub use bookmarks::SupabaseBookmarkStore;
pub use client::{AuthSession, SupabaseClient};
