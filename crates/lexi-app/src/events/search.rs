use std::sync::Arc;

use kanal::AsyncSender;
use lexi_core::search::SearchOutcome;
use lexi_types::{AppEvent, SearchState};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::events::bookmark::refresh_bookmark_state;
use crate::state::AppState;

pub async fn handle_search(state: Arc<AppState>, text: String, app_to_ui_tx: AsyncSender<AppEvent>) {
    match state.search.search(&text).await {
        SearchOutcome::Completed(result) => {
            tracing::debug!(
                meanings = result.result.len(),
                translations = result.translations.len(),
                "search completed"
            );
            if !result.result.is_empty() {
                refresh_bookmark_state(&state, &result.input_text, &app_to_ui_tx).await;
            }
        }
        SearchOutcome::Skipped => tracing::debug!("empty input, search skipped"),
        SearchOutcome::Superseded => {}
    }
}

/// Relay every observed search state step to the UI
pub async fn forward_search_updates(
    mut rx: watch::Receiver<SearchState>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if let Err(e) = app_to_ui_tx.send(AppEvent::SearchUpdated(snapshot)).await {
                    tracing::error!("Failed to send search update: {}", e);
                    break;
                }
            }
        }
    }
}
