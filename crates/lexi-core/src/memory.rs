use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use lexi_types::{Bookmark, NewBookmark};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::bookmarks::BookmarkStore;
use crate::error::StoreError;

/// Process-local bookmark store.
///
/// Can be switched into a failing mode to exercise store-error paths.
#[derive(Default)]
pub struct InMemoryBookmarkStore {
    rows: Mutex<Vec<Bookmark>>,
    failing: AtomicBool,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookmarkStore for InMemoryBookmarkStore {
    async fn find(&self, user_id: &str, word: &str) -> Result<Vec<Uuid>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|b| b.user_id == user_id && b.word == word)
            .map(|b| b.id)
            .collect())
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        self.check()?;
        let row = Bookmark {
            id: Uuid::new_v4(),
            user_id: bookmark.user_id,
            word: bookmark.word,
            definition_data: bookmark.definition_data,
            created_at: Utc::now(),
        };
        self.rows.lock().await.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check()?;
        self.rows.lock().await.retain(|b| b.id != id);
        Ok(())
    }

    async fn delete_word(&self, user_id: &str, word: &str) -> Result<(), StoreError> {
        self.check()?;
        self.rows
            .lock()
            .await
            .retain(|b| !(b.user_id == user_id && b.word == word));
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }
}
