//! Vier gewinnt - connect-four against a random computer opponent
//!
//! The server holds the authoritative game state; a browser client only
//! renders boards and posts column choices.
//!
//! # Architecture
//!
//! - **Games**: connect-four board, move validation and win detection
//! - **Session**: registry of in-progress games keyed by an opaque ID
//! - **Orchestrator**: one move request, human stone then computer reply
//! - **Db**: ranked highscores in SQLite
//! - **Server**: JSON API over axum
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vier_gewinnt::{GameOrchestrator, InMemoryHighscores, RandomPicker, SessionRegistry};
//!
//! let orchestrator = GameOrchestrator::new(
//!     SessionRegistry::new(),
//!     Box::new(RandomPicker::new()),
//!     Arc::new(InMemoryHighscores::new()),
//! );
//! let game = orchestrator.start("Ada")?;
//! let outcome = orchestrator.play_move(game.game_id(), 3)?;
//! println!("{}", outcome.board().display());
//! # Ok::<(), vier_gewinnt::GameError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod games;
mod orchestrator;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Highscore persistence
pub use db::{
    DbError, DbErrorKind, Highscore, HighscoreEntry, HighscoreRepository, HighscoreStore,
    InMemoryHighscores, NewHighscore,
};

// Crate-level exports - Game types (connect-four)
pub use games::connect_four::{
    Board, COLS, Cell, ColumnPicker, MoveError, Placement, Player, ROWS, RandomPicker,
    ScriptedPicker, WIN_LENGTH, check_win, has_four_in_a_row, is_draw, winner,
};

// Crate-level exports - Orchestration
pub use orchestrator::{GameError, GameOrchestrator, GameSnapshot, GameStart, GameStatus, MoveOutcome};

// Crate-level exports - HTTP API
pub use server::{
    AppState, ErrorResponse, GameStateResponse, Grid, HealthResponse, MoveRequest, MoveResponse,
    StartGameRequest, StartGameResponse, router,
};

// Crate-level exports - Session management
pub use session::{GameId, GameSession, SessionHandle, SessionRegistry, lock_session};
