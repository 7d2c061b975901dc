//! Vier gewinnt - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use vier_gewinnt::{
    AppState, GameOrchestrator, HighscoreRepository, HighscoreStore, RandomPicker, ServerConfig,
    SessionRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vier_gewinnt=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => run_server(config, host, port, db_path).await,
        Command::Highscores { db_path, limit } => print_highscores(db_path, limit),
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig::load_or_default(&config_path)?.with_overrides(host, port, db_path)?;
    info!(?config, "Starting vier_gewinnt server");

    let repository = HighscoreRepository::new(config.db_path().clone())?;
    repository.run_migrations()?;

    let orchestrator = Arc::new(GameOrchestrator::new(
        SessionRegistry::new(),
        Box::new(RandomPicker::new()),
        Arc::new(repository),
    ));
    let app = vier_gewinnt::router(AppState::new(orchestrator, *config.highscore_limit()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/",
        config.host(),
        config.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}

/// Print the highscore table to stdout
#[instrument]
fn print_highscores(db_path: String, limit: usize) -> Result<()> {
    let repository = HighscoreRepository::new(db_path)?;
    repository.run_migrations()?;

    let entries = repository.top(limit)?;
    if entries.is_empty() {
        println!("No highscores yet");
        return Ok(());
    }

    for (rank, entry) in entries.iter().enumerate() {
        println!("{:>2}. {:<20} {:>3} moves", rank + 1, entry.player_name(), entry.moves());
    }
    Ok(())
}
