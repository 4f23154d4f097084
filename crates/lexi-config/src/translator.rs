use serde::{Deserialize, Serialize};

use crate::{env_or, env_parse};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "mymemory".to_string()
}

fn default_from_lang() -> String {
    "en".to_string()
}

fn default_to_lang() -> String {
    "zh".to_string()
}

fn default_api_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            enabled: env_parse("LEXI_TRANSLATE_ENABLED").unwrap_or_else(default_enabled),
            api_url: env_or("LEXI_TRANSLATE_URL", default_api_url),
            ..Self::default()
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            api_url: default_api_url(),
        }
    }
}
