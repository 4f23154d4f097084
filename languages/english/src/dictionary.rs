use async_trait::async_trait;
use lexi_config::dictionary::DictionaryConfig;
use lexi_core::error::LookupError;
use lexi_core::language::Dictionary;
use lexi_types::{LookupResult, Meaning};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

/// Client for a free-dictionary style lexical service
#[derive(Clone)]
pub struct EnglishDictionary {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl EnglishDictionary {
    pub fn new(base_url: String, language: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            language,
        }
    }

    pub fn from_config(config: &DictionaryConfig) -> Self {
        Self::new(config.base_url.clone(), config.language.clone())
    }

    /// `<base>/<language>/<word>` with the word percent-encoded as one segment
    pub fn entry_url(&self, word: &str) -> Result<Url, LookupError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| LookupError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(&self.language)
            .push(word);

        Ok(url)
    }
}

#[async_trait]
impl Dictionary for EnglishDictionary {
    async fn lookup(&self, word: &str) -> Result<LookupResult, LookupError> {
        let url = self.entry_url(word)?;
        tracing::debug!(%url, "dictionary lookup");

        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(word.to_string()));
        }

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_entries(word, &body)
    }
}

#[derive(Deserialize)]
struct ApiEntry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

/// Sense groups of the first entry in a lookup response body.
/// Later entries are ignored.
pub fn parse_entries(word: &str, body: &str) -> Result<LookupResult, LookupError> {
    let entries: Vec<ApiEntry> =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NotFound(word.to_string()))?;

    Ok(first.meanings)
}
