pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// Translated text, or `None` when the provider could not deliver one.
    /// Failures are logged and never reach the caller.
    async fn translate_or_skip(&self, text: &str, from: &str, to: &str) -> Option<String> {
        match self.translate(text, from, to).await {
            Ok(translation) => Some(translation.text),
            Err(e) => {
                tracing::debug!(provider = %self.metadata().name, "translation unavailable: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
    /// Provider match score in `0.0..=1.0`, when reported
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: String, to: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Translator for Echo {
        async fn translate(
            &self,
            text: &str,
            from: &str,
            to: &str,
        ) -> Result<Translation, TranslateError> {
            if self.fail {
                return Err(TranslateError::RateLimitExceeded);
            }
            Ok(Translation {
                text: text.to_uppercase(),
                from: from.to_string(),
                to: to.to_string(),
                provider: "echo".to_string(),
                confidence: None,
            })
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "echo".to_string(),
                requires_api_key: false,
                free_tier_available: true,
            }
        }
    }

    #[tokio::test]
    async fn translate_or_skip_returns_text() {
        let t = Echo { fail: false };
        assert_eq!(t.translate_or_skip("hi", "en", "zh").await.as_deref(), Some("HI"));
    }

    #[tokio::test]
    async fn translate_or_skip_swallows_errors() {
        let t = Echo { fail: true };
        assert_eq!(t.translate_or_skip("hi", "en", "zh").await, None);
    }
}
