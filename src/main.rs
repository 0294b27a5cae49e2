//! Grid Duel - unified CLI
//!
//! Runs the HTTP game server or an AI-versus-AI game in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use grid_duel::{AppState, GameStore, ServerConfig, router, selfplay};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve {
            port,
            host,
            config,
            seed,
        } => run_http_server(config, host, port, seed).await,
        Command::Selfplay { seed, quiet } => run_selfplay(seed, quiet),
    }
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,grid_duel=debug")),
        )
        .init();
}

/// Run the HTTP game server
#[instrument(skip_all)]
async fn run_http_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    seed: Option<u64>,
) -> Result<()> {
    let config = ServerConfig::load(config_path.as_deref(), host, port, seed)?;

    info!("Starting Grid Duel HTTP server");

    let store = GameStore::new();
    let state = AppState::new(store, *config.ai_seed()).with_cors_origin(config.cors_origin())?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), cors_origin = %config.cors_origin(), "Server ready");
    info!("Routes: GET /health, POST /game/start, GET /game/state/{{id}}, POST /game/move, POST /ai/move");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Play an AI-versus-AI game and print it
fn run_selfplay(seed: Option<u64>, quiet: bool) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let state = selfplay::run("selfplay", &mut rng, |state| {
        if quiet {
            return;
        }
        if let Some(mv) = state.move_history().last() {
            println!("Move {}: {}", state.move_history().len(), mv);
        }
        println!("{}\n", state.board().display());
    })?;

    if quiet {
        println!("{}\n", state.board().display());
    }
    println!(
        "Result: {} after {} moves",
        state.winner(),
        state.move_history().len()
    );
    Ok(())
}
