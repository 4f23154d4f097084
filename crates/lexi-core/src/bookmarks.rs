use std::sync::Arc;

use lexi_types::{Bookmark, DefinitionData, NewBookmark};
use uuid::Uuid;

use crate::error::StoreError;

/// Persistence for bookmark rows. No transactional guarantees are assumed.
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Ids of rows matching user and (already lowercased) word
    async fn find(&self, user_id: &str, word: &str) -> Result<Vec<Uuid>, StoreError>;

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Delete every row matching user and (already lowercased) word
    async fn delete_word(&self, user_id: &str, word: &str) -> Result<(), StoreError>;

    /// All rows of a user, in no particular order
    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError>;
}

/// Bookmark operations keyed by user and case-insensitive word
#[derive(Clone)]
pub struct BookmarkService {
    store: Arc<dyn BookmarkStore>,
}

impl BookmarkService {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    pub async fn is_bookmarked(&self, user_id: &str, word: &str) -> Result<bool, StoreError> {
        let ids = self.store.find(user_id, &word.to_lowercase()).await?;
        Ok(!ids.is_empty())
    }

    /// Delete the bookmark if present, insert it otherwise.
    /// Returns whether the word is bookmarked afterwards.
    pub async fn toggle(
        &self,
        user_id: &str,
        word: &str,
        data: DefinitionData,
    ) -> Result<bool, StoreError> {
        let word = word.to_lowercase();

        if self.is_bookmarked(user_id, &word).await? {
            self.store.delete_word(user_id, &word).await?;
            tracing::info!(%word, "bookmark removed");
            Ok(false)
        } else {
            let created = self
                .store
                .insert(NewBookmark::new(user_id, &word, data))
                .await?;
            tracing::info!(%word, id = %created.id, "bookmark added");
            Ok(true)
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        self.store.list(user_id).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
