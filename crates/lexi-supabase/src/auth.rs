use async_trait::async_trait;
use lexi_config::backend::BackendConfig;
use lexi_core::error::AuthError;
use lexi_core::session::SessionProvider;
use lexi_types::{Credentials, Identity};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::client::{AuthSession, SupabaseClient, failure};

/// GoTrue-style auth endpoints of the hosted backend
pub struct SupabaseAuth {
    client: SupabaseClient,
    oauth_provider: String,
    oauth_redirect: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: Identity,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient, config: &BackendConfig) -> Self {
        Self {
            client,
            oauth_provider: config.oauth_provider.clone(),
            oauth_redirect: config.oauth_redirect.clone(),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .client
            .request(Method::GET, &self.client.auth_url("user"), Some(access_token))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                let user = parse_user(&body)?;
                Ok(Some(user))
            }
            _ => {
                let (status, message) = failure(response).await;
                Err(AuthError::Status { status, message })
            }
        }
    }

    async fn grant(&self, grant_type: &str, body: serde_json::Value) -> Result<AuthSession, AuthError> {
        let url = self.client.auth_url(&format!("token?grant_type={grant_type}"));
        let response = self
            .client
            .request(Method::POST, &url, None)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            let (_, message) = failure(response).await;
            return Err(AuthError::InvalidCredentials(message));
        }

        if !response.status().is_success() {
            let (status, message) = failure(response).await;
            return Err(AuthError::Status { status, message });
        }

        let body = response.text().await?;
        parse_token_response(&body)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        tracing::debug!("refreshing session");
        self.grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }
}

#[async_trait]
impl SessionProvider for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.client.session().await else {
            return Ok(None);
        };

        if let Some(user) = self.fetch_user(&session.access_token).await? {
            return Ok(Some(user));
        }

        // Access token expired; try once with the refresh token
        let refreshed = match session.refresh_token.as_deref() {
            Some(token) => self.refresh(token).await.ok(),
            None => None,
        };

        let identity = refreshed.as_ref().map(|s| s.user.clone());
        self.client.set_session(refreshed).await;
        Ok(identity)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<Identity, AuthError> {
        let session = match credentials {
            Credentials::Password { email, password } => {
                self.grant("password", json!({ "email": email, "password": password }))
                    .await?
            }
            Credentials::Tokens {
                access_token,
                refresh_token,
            } => {
                let user = self.fetch_user(&access_token).await?.ok_or_else(|| {
                    AuthError::InvalidCredentials("access token rejected".to_string())
                })?;
                AuthSession {
                    access_token,
                    refresh_token,
                    user,
                }
            }
        };

        let identity = session.user.clone();
        self.client.set_session(Some(session)).await;
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.client.access_token().await else {
            return Err(AuthError::NotSignedIn);
        };
        self.client.set_session(None).await;

        let response = self
            .client
            .request(Method::POST, &self.client.auth_url("logout"), Some(&token))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = failure(response).await;
            return Err(AuthError::Status { status, message });
        }

        Ok(())
    }

    fn authorize_url(&self) -> Option<String> {
        authorize_url(
            &self.client.auth_url("authorize"),
            &self.oauth_provider,
            &self.oauth_redirect,
        )
    }
}

fn authorize_url(endpoint: &str, provider: &str, redirect: &str) -> Option<String> {
    Url::parse_with_params(endpoint, &[("provider", provider), ("redirect_to", redirect)])
        .map(String::from)
        .map_err(|e| tracing::warn!("invalid authorize URL: {e}"))
        .ok()
}

fn parse_user(body: &str) -> Result<Identity, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
}

fn parse_token_response(body: &str) -> Result<AuthSession, AuthError> {
    let token: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))?;

    Ok(AuthSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        user: token.user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = r#"{
        "id": "8d0f6c1e-8a43-4d0b-a2a4-2b8f3c2d9e11",
        "aud": "authenticated",
        "email": "ada@example.com",
        "user_metadata": {
            "avatar_url": "https://lh3.googleusercontent.com/a/abc=s96-c",
            "full_name": "Ada Lovelace",
            "email_verified": true
        },
        "app_metadata": { "provider": "google" }
    }"#;

    #[test]
    fn user_body_maps_to_identity() {
        let identity = parse_user(USER).unwrap();
        assert_eq!(identity.id, "8d0f6c1e-8a43-4d0b-a2a4-2b8f3c2d9e11");
        assert_eq!(identity.display_name(), "Ada Lovelace");
        assert!(identity.metadata.avatar_url.is_some());
    }

    #[test]
    fn token_response_carries_session() {
        let body = format!(
            r#"{{"access_token":"jwt","token_type":"bearer","expires_in":3600,"refresh_token":"r1","user":{USER}}}"#
        );
        let session = parse_token_response(&body).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn malformed_user_is_a_decode_error() {
        assert!(matches!(parse_user("{}"), Err(AuthError::Decode(_))));
    }

    #[test]
    fn authorize_url_encodes_redirect() {
        let url = authorize_url(
            "https://xyz.supabase.co/auth/v1/authorize",
            "google",
            "http://localhost:3000/cb?x=1",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://xyz.supabase.co/auth/v1/authorize?provider=google&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fcb%3Fx%3D1"
        );
    }

    #[tokio::test]
    async fn sign_out_without_session_is_reported() {
        let client = SupabaseClient::new("http://127.0.0.1:9".into(), "anon".into());
        let auth = SupabaseAuth::new(client, &BackendConfig::default());
        assert!(matches!(auth.sign_out().await, Err(AuthError::NotSignedIn)));
        assert_eq!(auth.current_session().await.unwrap(), None);
    }
}
