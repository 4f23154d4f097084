use std::sync::Arc;

use lexi_config::backend::BackendConfig;
use lexi_types::Identity;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tokio::sync::RwLock;

/// Tokens and user of a signed-in session
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Identity,
}

/// Shared HTTP plumbing for the auth and REST endpoints.
///
/// Clones share the same session, so the bookmark store always sends the
/// token of whoever signed in through [`crate::SupabaseAuth`].
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            client: reqwest::Client::new(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.url.clone(), config.anon_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request with `apikey` set; authorized as `bearer`, or as the anon role
    pub(crate) fn request(&self, method: Method, url: &str, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    pub async fn session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub(crate) async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().await = session;
    }
}

/// Status and best-effort message of a failed response
pub(crate) async fn failure(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, extract_message(&body))
}

/// Human-readable message from an auth or REST error body
pub(crate) fn extract_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
