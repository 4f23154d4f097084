use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_base_url() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// Lexical lookup service; requests go to `<base_url>/<language>/<word>`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl DictionaryConfig {
    pub fn new() -> Self {
        Self {
            base_url: env_or("LEXI_DICTIONARY_URL", default_base_url),
            language: env_or("LEXI_DICTIONARY_LANGUAGE", default_language),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
        }
    }
}
