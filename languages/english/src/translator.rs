use async_trait::async_trait;
use lexi_config::translator::TranslatorConfig;
use lexi_translator::{ProviderMetadata, TranslateError, Translation, Translator};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// MyMemory-style GET translation endpoint (`?q=<text>&langpair=<from>|<to>`)
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl MyMemoryTranslator {
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(config.api_url.clone())
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translation, TranslateError> {
        if from.eq_ignore_ascii_case(to) {
            return Err(TranslateError::UnsupportedLanguagePair {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let langpair = format!("{from}|{to}");
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_response(&body, from, to)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "MyMemory".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(rename = "responseStatus")]
    status: Value,
    #[serde(rename = "responseDetails", default)]
    details: Value,
    #[serde(rename = "responseData", default)]
    data: Option<ApiData>,
}

#[derive(Deserialize)]
struct ApiData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
    #[serde(rename = "match", default)]
    score: Option<f32>,
}

/// The service reports its status both as a number and as a string
fn status_code(status: &Value) -> Option<u16> {
    match status {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Translation from a response body; anything but status 200 is a failure
pub fn parse_response(body: &str, from: &str, to: &str) -> Result<Translation, TranslateError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {}", e)))?;

    match status_code(&response.status) {
        Some(200) => {}
        Some(429) => return Err(TranslateError::RateLimitExceeded),
        status => {
            let details = response.details.as_str().unwrap_or_default();
            return Err(TranslateError::ApiError(format!(
                "status {}: {}",
                status.map_or_else(|| response.status.to_string(), |s| s.to_string()),
                details
            )));
        }
    }

    let data = response
        .data
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;
    let text = data
        .translated_text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

    Ok(Translation {
        text,
        from: from.to_string(),
        to: to.to_string(),
        provider: "mymemory".to_string(),
        confidence: data.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_returns_translated_text() {
        let body = r#"{
            "responseData": { "translatedText": "你好", "match": 0.98 },
            "responseDetails": "",
            "responseStatus": 200,
            "matches": []
        }"#;
        let t = parse_response(body, "en", "zh").unwrap();
        assert_eq!(t.text, "你好");
        assert_eq!(t.to, "zh");
        assert_eq!(t.confidence, Some(0.98));
    }

    #[test]
    fn string_status_is_accepted() {
        let body = r#"{"responseData":{"translatedText":"猫"},"responseStatus":"200"}"#;
        assert_eq!(parse_response(body, "en", "zh").unwrap().text, "猫");
    }

    #[test]
    fn non_success_status_is_unavailable() {
        let body = r#"{
            "responseData": { "translatedText": "INVALID LANGUAGE PAIR" },
            "responseDetails": "INVALID LANGUAGE PAIR",
            "responseStatus": "403"
        }"#;
        let err = parse_response(body, "en", "xx").unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn quota_status_maps_to_rate_limit() {
        let body = r#"{"responseData":{"translatedText":"MYMEMORY WARNING"},"responseStatus":429}"#;
        assert!(matches!(
            parse_response(body, "en", "zh"),
            Err(TranslateError::RateLimitExceeded)
        ));
    }

    #[test]
    fn missing_text_is_unavailable() {
        let body = r#"{"responseData":{"translatedText":""},"responseStatus":200}"#;
        assert!(parse_response(body, "en", "zh").is_err());
        assert!(parse_response("<html>", "en", "zh").is_err());
    }

    #[tokio::test]
    async fn same_language_pair_is_rejected_without_a_request() {
        let t = MyMemoryTranslator::new("http://127.0.0.1:9/get".into());
        assert!(matches!(
            t.translate("hi", "en", "EN").await,
            Err(TranslateError::UnsupportedLanguagePair { .. })
        ));
    }
}
