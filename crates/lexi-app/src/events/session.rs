use std::sync::Arc;

use kanal::AsyncSender;
use lexi_core::session::SessionSubscription;
use lexi_types::{AppEvent, Credentials};
use tokio_util::sync::CancellationToken;

use crate::events::bookmark::refresh_bookmark_state;
use crate::state::AppState;

const NO_BACKEND: &str = "Sign-in is not configured.";

pub async fn handle_sign_in(
    state: Arc<AppState>,
    credentials: Credentials,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(session) = &state.session else {
        app_to_ui_tx
            .send(AppEvent::Status(NO_BACKEND.to_string()))
            .await?;
        return Ok(());
    };

    // Identity changes reach the UI through the session subscription
    if let Err(e) = session.sign_in(credentials).await {
        tracing::error!("Error signing in: {}", e);
        app_to_ui_tx
            .send(AppEvent::Status(format!("Sign-in failed: {e}")))
            .await?;
    }

    Ok(())
}

pub async fn handle_oauth_url(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let message = match state.session.as_ref().and_then(|s| s.authorize_url()) {
        Some(url) => format!(
            "Open this URL to sign in, then run /token <access_token> [refresh_token]:\n{url}"
        ),
        None => NO_BACKEND.to_string(),
    };
    app_to_ui_tx.send(AppEvent::Status(message)).await?;
    Ok(())
}

pub async fn handle_sign_out(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(session) = &state.session else {
        app_to_ui_tx
            .send(AppEvent::Status(NO_BACKEND.to_string()))
            .await?;
        return Ok(());
    };

    if let Err(e) = session.sign_out().await {
        tracing::error!("Error signing out: {}", e);
    }

    Ok(())
}

/// Relay identity changes to the UI for as long as the subscription lives
pub async fn forward_session_changes(
    state: Arc<AppState>,
    mut subscription: SessionSubscription,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) {
    if let Err(e) = app_to_ui_tx
        .send(AppEvent::SessionChanged(subscription.current()))
        .await
    {
        tracing::error!("Failed to send session state: {}", e);
        return;
    }

    loop {
        let identity = tokio::select! {
            _ = cancel.cancelled() => break,
            changed = subscription.changed() => match changed {
                Some(identity) => identity,
                None => break,
            },
        };

        let signed_in = identity.is_some();
        if let Err(e) = app_to_ui_tx.send(AppEvent::SessionChanged(identity)).await {
            tracing::error!("Failed to send session state: {}", e);
            break;
        }

        if signed_in {
            let current = state.search.snapshot();
            if !current.result.is_empty() {
                refresh_bookmark_state(&state, &current.input_text, &app_to_ui_tx).await;
            }
        } else {
            state.bookmark_list.lock().await.set_bookmarks(Vec::new());
        }
    }
}
