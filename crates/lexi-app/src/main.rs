use std::sync::Arc;

use clap::Parser;
use lexi_config::Config;
use lexi_core::search::SearchOutcome;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod commands;
mod controller;
mod events;
mod profile;
mod render;
mod state;
mod ui;


use self::controller::AppController;
use self::state::AppState;

/// Look up English words, with Chinese translations and bookmarks
#[derive(Parser)]
#[command(name = "lexi", version)]
struct Args {
    /// Profile to load from the profile directory
    #[arg(long, default_value = "main")]
    profile: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Look up a single word, print it and exit
    word: Option<String>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,lexi_app=info,lexi_core=info,lexi_supabase=info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

fn load_config(profile: &str) -> Config {
    if let Err(e) = profile::init_user_config() {
        tracing::warn!("Failed to initialize profiles: {e}");
    }

    let mut config = profile::load_user_profile(profile).unwrap_or_else(|e| {
        tracing::error!("Failed to load profile {profile}: {e}, using defaults");
        Config::new()
    });
    // Profiles seeded before the backend was set up carry empty credentials
    config.backend.fill_missing_from_env();
    config
}

async fn lookup_once(state: &AppState, word: &str) -> anyhow::Result<()> {
    match state.search.search(word).await {
        SearchOutcome::Completed(result) => print!("{}", render::render_search(&result)),
        SearchOutcome::Skipped => anyhow::bail!("nothing to look up"),
        SearchOutcome::Superseded => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env next to the binary's working directory
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_json);

    let state = Arc::new(AppState::new(load_config(&args.profile)));

    if let Some(word) = args.word {
        return lookup_once(&state, &word).await;
    }

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    AppController::new(state)
        .run(ui::spawn_stdin_reader(), shutdown)
        .await
}
