use std::env;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::dictionary::DictionaryConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod backend;
pub mod dictionary;
pub mod translator;
pub mod ui;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,
    pub backend: BackendConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            dictionary: DictionaryConfig::new(),
            translator: TranslatorConfig::new(),
            backend: BackendConfig::new(),
            ui: UiConfig::new(),
        }
    }
}

pub(crate) fn env_or(key: &str, default: impl FnOnce() -> String) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(default)
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
