//! Command-line interface for vier_gewinnt.

use clap::{Parser, Subcommand};

/// Vier gewinnt - connect-four against a random computer opponent
#[derive(Parser, Debug)]
#[command(name = "vier_gewinnt")]
#[command(about = "Connect-four game server with SQLite highscores", long_about = None)]
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
        /// Path to the TOML config file (defaults apply if it is missing)
        #[arg(short, long, default_value = "vier_gewinnt.toml")]
        config: std::path::PathBuf,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the highscore database (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print the highscore table
    Highscores {
        /// Path to the highscore database
        #[arg(long, default_value = "vier_gewinnt.db")]
        db_path: String,

        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}
