use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Search steps, bookmark pages and status lines headed for the terminal
const UPDATE_CAPACITY: usize = 256;
/// Parsed user commands
const COMMAND_CAPACITY: usize = 64;

/// Owns the event loop and the terminal loop for one interactive session
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Run until either loop exits or `shutdown` resolves, then stop both.
    /// Returns the error of the loop that ended first, if it failed.
    pub async fn run(
        self,
        input_rx: kanal::AsyncReceiver<String>,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        let (command_tx, command_rx) = kanal::bounded_async(COMMAND_CAPACITY);
        let (update_tx, update_rx) = kanal::bounded_async(UPDATE_CAPACITY);

        let mut tasks = JoinSet::new();
        tasks.spawn(event_loop(
            self.state.clone(),
            command_rx,
            update_tx,
            self.cancel_token.child_token(),
        ));
        tasks.spawn(ui_loop(
            input_rx,
            update_rx,
            command_tx,
            self.state.config.clone(),
            self.cancel_token.child_token(),
        ));

        let first = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown requested");
                Ok(())
            }
            Some(joined) = tasks.join_next() => flatten(joined),
        };

        self.cancel_token.cancel();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = flatten(joined) {
                tracing::error!("task failed during shutdown: {e}");
            }
        }

        first
    }
}

fn flatten(joined: Result<anyhow::Result<()>, JoinError>) -> anyhow::Result<()> {
    joined.map_err(|e| anyhow::anyhow!("task panicked: {e}"))?
}
