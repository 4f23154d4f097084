use serde::{Deserialize, Serialize};

use crate::env_parse;

fn default_page_size() -> usize {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Bookmarks per page in the list view
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl UiConfig {
    pub fn new() -> Self {
        Self {
            page_size: env_parse::<usize>("LEXI_PAGE_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or_else(default_page_size),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}
