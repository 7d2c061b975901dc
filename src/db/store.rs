//! Persistence seam between the game orchestrator and highscore storage.

use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

use crate::db::{DbError, DbErrorKind, HighscoreEntry};

/// Append-only ranked highscore storage.
///
/// Implementations must accept concurrent `record` calls from unrelated
/// games.
pub trait HighscoreStore: Send + Sync + std::fmt::Debug {
    /// Appends a (player name, move count) entry.
    fn record(&self, player_name: &str, moves: u32) -> Result<(), DbError>;

    /// Returns at most `limit` entries, fewest moves first.
    fn top(&self, limit: usize) -> Result<Vec<HighscoreEntry>, DbError>;
}

/// Process-local highscore list, lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHighscores {
    entries: Mutex<Vec<HighscoreEntry>>,
}

impl InMemoryHighscores {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HighscoreStore for InMemoryHighscores {
    #[instrument(skip(self))]
    fn record(&self, player_name: &str, moves: u32) -> Result<(), DbError> {
        let moves = i32::try_from(moves).map_err(|_| {
            DbError::new(DbErrorKind::Input, format!("Move count {} does not fit", moves))
        })?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(HighscoreEntry::new(player_name.to_string(), moves));
        debug!(total = entries.len(), "Highscore kept in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    fn top(&self, limit: usize) -> Result<Vec<HighscoreEntry>, DbError> {
        let mut ranked = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        // Stable sort keeps insertion order among equal move counts.
        ranked.sort_by_key(|e| *e.moves());
        ranked.truncate(limit);
        Ok(ranked)
    }
}
