use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod bookmark;
pub mod bookmark_list;
pub mod search;
pub mod session;

use bookmark::handle_bookmark_toggle;
use bookmark_list::{handle_bookmark_navigation, handle_bookmark_removal, handle_show_bookmarks};
use search::{forward_search_updates, handle_search};
use session::{forward_session_changes, handle_oauth_url, handle_sign_in, handle_sign_out};

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tokio::spawn(forward_search_updates(
        state.search.subscribe(),
        app_to_ui_tx.clone(),
        cancel.child_token(),
    ));

    if let Some(session) = &state.session {
        if let Err(e) = session.refresh().await {
            tracing::warn!("Failed to restore session: {e}");
        }
        tokio::spawn(forward_session_changes(
            state.clone(),
            session.subscribe(),
            app_to_ui_tx.clone(),
            cancel.child_token(),
        ));
    }

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] EVENT RECEIVED: {:?}", std::mem::discriminant(&event));
        if matches!(event, AppEvent::Quit) {
            tracing::info!("Quit requested");
            cancel.cancel();
            break;
        }

        handle_events(state.clone(), &app_to_ui_tx, event).await?;
    }

    Ok(())
}

async fn handle_events(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::Search(text) => {
            // Own task so a newer search can supersede this one
            tokio::spawn(handle_search(state, text, app_to_ui_tx.clone()));
        }
        AppEvent::ToggleBookmark => {
            handle_bookmark_toggle(state, app_to_ui_tx).await?;
        }
        AppEvent::ShowBookmarks => {
            handle_show_bookmarks(state, app_to_ui_tx).await?;
        }
        event @ (AppEvent::SortBookmarks(_)
        | AppEvent::GoToPage(_)
        | AppEvent::NextPage
        | AppEvent::PrevPage
        | AppEvent::SelectBookmark(_)) => {
            handle_bookmark_navigation(state, event, app_to_ui_tx).await?;
        }
        AppEvent::RemoveBookmark(position) => {
            handle_bookmark_removal(state, position, app_to_ui_tx).await?;
        }
        AppEvent::SignIn(credentials) => {
            handle_sign_in(state, credentials, app_to_ui_tx).await?;
        }
        AppEvent::RequestOAuthUrl => {
            handle_oauth_url(state, app_to_ui_tx).await?;
        }
        AppEvent::SignOut => {
            handle_sign_out(state, app_to_ui_tx).await?;
        }
        AppEvent::Quit => {}
        AppEvent::SearchUpdated(_)
        | AppEvent::BookmarkState { .. }
        | AppEvent::ShowBookmarkPage(_)
        | AppEvent::SessionChanged(_)
        | AppEvent::Status(_) => {
            // UI-only events, ignore in backend
        }
    }

    Ok(())
}
