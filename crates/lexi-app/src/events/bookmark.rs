use std::sync::Arc;

use kanal::AsyncSender;
use lexi_types::AppEvent;

use crate::state::AppState;

/// Tell the UI whether `word` is bookmarked by the signed-in user.
/// Silent when signed out or when the store fails.
pub async fn refresh_bookmark_state(
    state: &AppState,
    word: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) {
    let (Some(user_id), Some(bookmarks)) = (state.user_id(), &state.bookmarks) else {
        return;
    };

    match bookmarks.is_bookmarked(&user_id, word).await {
        Ok(bookmarked) => {
            let event = AppEvent::BookmarkState {
                word: word.to_lowercase(),
                bookmarked,
            };
            if let Err(e) = app_to_ui_tx.send(event).await {
                tracing::error!("Failed to send bookmark state: {}", e);
            }
        }
        Err(e) => tracing::error!("Error checking bookmark: {}", e),
    }
}

pub async fn handle_bookmark_toggle(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(bookmarks) = &state.bookmarks else {
        tracing::warn!("Bookmarks unavailable without a backend");
        app_to_ui_tx
            .send(AppEvent::Status("Bookmarks are not configured.".to_string()))
            .await?;
        return Ok(());
    };

    let Some(user_id) = state.user_id() else {
        app_to_ui_tx
            .send(AppEvent::Status("Sign in to bookmark words.".to_string()))
            .await?;
        return Ok(());
    };

    let current = state.search.snapshot();
    if current.loading || current.result.is_empty() {
        app_to_ui_tx
            .send(AppEvent::Status("Look up a word first.".to_string()))
            .await?;
        return Ok(());
    }

    match bookmarks
        .toggle(&user_id, &current.input_text, current.definition_data())
        .await
    {
        Ok(bookmarked) => {
            app_to_ui_tx
                .send(AppEvent::BookmarkState {
                    word: current.input_text.to_lowercase(),
                    bookmarked,
                })
                .await?;
        }
        Err(e) => {
            tracing::error!("Error toggling bookmark: {}", e);
        }
    }

    Ok(())
}
