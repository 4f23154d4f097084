use async_trait::async_trait;
use lexi_config::backend::BackendConfig;
use lexi_core::bookmarks::BookmarkStore;
use lexi_core::error::StoreError;
use lexi_types::{Bookmark, NewBookmark};
use reqwest::{Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::client::{SupabaseClient, failure};

/// Bookmark rows in a PostgREST table, authorized as the signed-in user
pub struct SupabaseBookmarkStore {
    client: SupabaseClient,
    table: String,
}

#[derive(Deserialize)]
struct IdRow {
    id: Uuid,
}

impl SupabaseBookmarkStore {
    pub fn new(client: SupabaseClient, config: &BackendConfig) -> Self {
        Self {
            client,
            table: config.bookmarks_table.clone(),
        }
    }

    async fn bearer(&self) -> Result<String, StoreError> {
        self.client
            .access_token()
            .await
            .ok_or(StoreError::NotSignedIn)
    }

    async fn send(
        &self,
        method: Method,
        filters: &[(&str, String)],
        body: Option<&NewBookmark>,
    ) -> Result<Response, StoreError> {
        let token = self.bearer().await?;
        let mut request = self
            .client
            .request(method, &self.client.rest_url(&self.table), Some(&token))
            .query(filters);

        if let Some(body) = body {
            request = request.header("Prefer", "return=representation").json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let (status, message) = failure(response).await;
            return Err(StoreError::Status { status, message });
        }
        Ok(response)
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.text().await?;
    parse_rows(&body)
}

fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl BookmarkStore for SupabaseBookmarkStore {
    async fn find(&self, user_id: &str, word: &str) -> Result<Vec<Uuid>, StoreError> {
        let filters = [
            ("select", "id".to_string()),
            ("user_id", eq(user_id)),
            ("word", eq(word)),
        ];
        let response = self.send(Method::GET, &filters, None).await?;
        let rows: Vec<IdRow> = decode(response).await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let response = self.send(Method::POST, &[], Some(&bookmark)).await?;
        let rows: Vec<Bookmark> = decode(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.send(Method::DELETE, &[("id", eq(&id.to_string()))], None)
            .await?;
        Ok(())
    }

    async fn delete_word(&self, user_id: &str, word: &str) -> Result<(), StoreError> {
        let filters = [("user_id", eq(user_id)), ("word", eq(word))];
        self.send(Method::DELETE, &filters, None).await?;
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let filters = [("select", "*".to_string()), ("user_id", eq(user_id))];
        let response = self.send(Method::GET, &filters, None).await?;
        decode(response).await
    }
}
