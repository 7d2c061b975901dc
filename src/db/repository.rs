//! SQLite-backed highscore repository.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, DbErrorKind, Highscore, HighscoreEntry, HighscoreStore, NewHighscore, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for highscores.
///
/// Opens a fresh connection per operation, so concurrent writers each get
/// their own handle and SQLite serializes the inserts.
#[derive(Debug, Clone)]
pub struct HighscoreRepository {
    db_path: String,
}

impl HighscoreRepository {
    /// Creates a repository for the database at `db_path`.
    ///
    /// Nothing is opened yet; call [`HighscoreRepository::run_migrations`] to
    /// create the table if it is missing.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Input, "Database path is empty"));
        }
        info!(path = %db_path, "Creating HighscoreRepository");
        Ok(Self { db_path })
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connect,
                format!("Failed to open '{}': {}", self.db_path, e),
            )
        })?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS)).execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies the embedded schema. Existing rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(applied = applied.len(), "Highscore schema ready");
        Ok(())
    }

    /// Records a highscore and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, score), fields(player_name = %score.player_name(), moves = score.moves()))]
    pub fn record_score(&self, score: NewHighscore) -> Result<Highscore, DbError> {
        debug!("Recording highscore");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::highscores::table)
            .values(&score)
            .returning(Highscore::as_returning())
            .get_result(&mut conn)?;

        info!(
            highscore_id = stored.id(),
            player_name = %stored.player_name(),
            moves = stored.moves(),
            "Highscore recorded"
        );
        Ok(stored)
    }

    /// Loads the best `limit` scores, fewest moves first. Ties keep
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn top_scores(&self, limit: usize) -> Result<Vec<Highscore>, DbError> {
        debug!(limit, "Loading top highscores");
        let mut conn = self.connection()?;

        let scores = schema::highscores::table
            .order((schema::highscores::moves.asc(), schema::highscores::id.asc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(Highscore::as_select())
            .load(&mut conn)?;

        info!(count = scores.len(), "Highscores loaded");
        Ok(scores)
    }

    /// Counts every stored highscore.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let total = schema::highscores::table.count().get_result(&mut conn)?;
        debug!(total, "Counted highscores");
        Ok(total)
    }
}

impl HighscoreStore for HighscoreRepository {
    fn record(&self, player_name: &str, moves: u32) -> Result<(), DbError> {
        let moves = i32::try_from(moves)
            .map_err(|_| DbError::new(
                DbErrorKind::Input,
                format!("Move count {} does not fit the table", moves),
            ))?;
        self.record_score(NewHighscore::new(player_name.to_string(), moves))
            .map(|_| ())
    }

    fn top(&self, limit: usize) -> Result<Vec<HighscoreEntry>, DbError> {
        Ok(self.top_scores(limit)?.iter().map(Highscore::to_entry).collect())
    }
}
