//! Highscore models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// Stored highscore row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::highscores)]
pub struct Highscore {
    id: i32,
    player_name: String,
    moves: i32,
    created_at: NaiveDateTime,
}

impl Highscore {
    /// Projects the row onto its ranked (name, moves) pair.
    pub fn to_entry(&self) -> HighscoreEntry {
        HighscoreEntry::new(self.player_name.clone(), self.moves)
    }
}

/// Insertable highscore for a won game.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::highscores)]
pub struct NewHighscore {
    player_name: String,
    moves: i32,
}

/// A ranked highscore: fewer moves rank higher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new, Getters)]
pub struct HighscoreEntry {
    player_name: String,
    moves: i32,
}
