pub mod dictionary;
pub mod translator;

pub use dictionary::EnglishDictionary;
pub use translator::MyMemoryTranslator;
