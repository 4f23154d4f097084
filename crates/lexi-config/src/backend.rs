use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_bookmarks_table() -> String {
    "bookmarked_words".to_string()
}

fn default_oauth_provider() -> String {
    "google".to_string()
}

fn default_oauth_redirect() -> String {
    "http://localhost:3000".to_string()
}

/// Hosted backend used for auth and bookmark persistence
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Public anon key sent as `apikey`
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_bookmarks_table")]
    pub bookmarks_table: String,
    #[serde(default = "default_oauth_provider")]
    pub oauth_provider: String,
    #[serde(default = "default_oauth_redirect")]
    pub oauth_redirect: String,
}

impl BackendConfig {
    pub fn new() -> Self {
        Self {
            url: env_or("SUPABASE_URL", String::new),
            anon_key: env_or("SUPABASE_ANON_KEY", String::new),
            bookmarks_table: env_or("LEXI_BOOKMARKS_TABLE", default_bookmarks_table),
            oauth_provider: env_or("LEXI_OAUTH_PROVIDER", default_oauth_provider),
            oauth_redirect: env_or("LEXI_OAUTH_REDIRECT", default_oauth_redirect),
        }
    }

    /// Fill an empty url or key from the environment
    pub fn fill_missing_from_env(&mut self) {
        if self.url.trim().is_empty() {
            self.url = env_or("SUPABASE_URL", String::new);
        }
        if self.anon_key.trim().is_empty() {
            self.anon_key = env_or("SUPABASE_ANON_KEY", String::new);
        }
    }

    /// Auth and bookmarks are only available with both url and key
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bookmarks_table: default_bookmarks_table(),
            oauth_provider: default_oauth_provider(),
            oauth_redirect: default_oauth_redirect(),
        }
    }
}
