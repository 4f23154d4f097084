use std::io::BufRead;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexi_config::Config;
use lexi_types::{AppEvent, Identity};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::commands::{Command, HELP, parse_command};
use crate::render::{render_bookmark_page, render_identity, render_search};

/// Read stdin on a plain thread so a pending read never holds up runtime shutdown
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        tracing::debug!("stdin reader stopping");
    });

    rx.to_async()
}

/// What the terminal has shown so far
#[derive(Default)]
pub struct TerminalView {
    identity: Option<Identity>,
    announced_loading: Option<String>,
}

impl TerminalView {
    /// Text to print for an app event, if any
    pub fn apply(&mut self, event: AppEvent) -> Option<String> {
        match event {
            AppEvent::SearchUpdated(state) => {
                if state.loading {
                    // Translation steps only change the state, print once per search
                    if self.announced_loading.as_deref() == Some(state.input_text.as_str()) {
                        return None;
                    }
                    self.announced_loading = Some(state.input_text.clone());
                } else {
                    self.announced_loading = None;
                }
                Some(render_search(&state))
            }
            AppEvent::BookmarkState { word, bookmarked } => Some(if bookmarked {
                format!("  * \"{word}\" is bookmarked\n")
            } else {
                format!("  - \"{word}\" is not bookmarked (/bookmark to save)\n")
            }),
            AppEvent::ShowBookmarkPage(page) => Some(render_bookmark_page(&page)),
            AppEvent::SessionChanged(identity) => {
                let changed = self.identity != identity;
                self.identity = identity;
                changed.then(|| format!("{}\n", render_identity(self.identity.as_ref())))
            }
            AppEvent::Status(message) => Some(format!("{message}\n")),
            _ => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

pub async fn ui_loop(
    input_rx: AsyncReceiver<String>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    {
        let config = config.read().await;
        println!(
            "lexi: English dictionary ({} -> {} translations). /help for commands.",
            config.translator.from_lang, config.translator.to_lang
        );
    }

    let mut view = TerminalView::default();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = input_rx.recv() => {
                let Ok(line) = line else {
                    // stdin closed
                    ui_to_app_tx.send(AppEvent::Quit).await?;
                    break;
                };

                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Event(event))) => ui_to_app_tx.send(event).await?,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(Command::WhoAmI)) => println!("{}", render_identity(view.identity())),
                    Ok(Some(Command::Quit)) => {
                        ui_to_app_tx.send(AppEvent::Quit).await?;
                        break;
                    }
                    Err(message) => println!("{message}"),
                }
            }
            event = app_to_ui_rx.recv() => {
                if let Some(text) = view.apply(event?) {
                    print!("{text}");
                }
            }
        }
    }

    Ok(())
}
