//! Command-line interface for grid_duel.

use clap::{Parser, Subcommand};

/// Grid Duel - two-player tile-capture game server
#[derive(Parser, Debug)]
#[command(name = "grid_duel")]
#[command(about = "Game server for Grid Duel, a 6x6 tile-capture game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Port to bind to (overrides config file and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for the AI's tie-breaks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play one AI-versus-AI game in the terminal
    Selfplay {
        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Only print the final board and result
        #[arg(short, long)]
        quiet: bool,
    },
}
