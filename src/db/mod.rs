//! Highscore persistence.

mod error;
mod models;
mod repository;
mod schema;
mod store;

pub use error::{DbError, DbErrorKind};
pub use models::{Highscore, HighscoreEntry, NewHighscore};
pub use repository::HighscoreRepository;
pub use store::{HighscoreStore, InMemoryHighscores};
