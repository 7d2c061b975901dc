//! Highscore store error type.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Stage of a highscore operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DbErrorKind {
    /// The store was given something it cannot hold (blank path, oversized
    /// move count).
    #[display("input")]
    Input,
    /// The database file could not be opened.
    #[display("connect")]
    Connect,
    /// Creating or updating the schema failed.
    #[display("migrate")]
    Migrate,
    /// A read or write against an open database failed.
    #[display("query")]
    Query,
}

/// Failure reading or writing highscores, tagged with its stage and the
/// caller location.
#[derive(Debug, Clone, Display, Error)]
#[display("Highscore {} failure: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Stage that failed.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a store error of `kind`, recording where it was raised.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%kind, error_message = %message, file = loc.file(), line = loc.line(), "Highscore store error");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connect, err.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for DbError {
    #[track_caller]
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(DbErrorKind::Migrate, err.to_string())
    }
}
