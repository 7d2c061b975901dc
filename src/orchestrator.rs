//! Drives one move request: human stone, win check, computer reply.

use crate::db::{DbError, HighscoreEntry, HighscoreStore};
use crate::games::connect_four::{Board, COLS, ColumnPicker, MoveError, Player};
use crate::session::{GameId, GameSession, SessionRegistry, lock_session};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, instrument, warn};

/// Result of a move request, from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// The human completed four in a row.
    Win,
    /// The computer completed four in a row.
    Lose,
    /// The board filled up with no winner.
    Draw,
    /// The game continues.
    Ongoing,
}

impl GameStatus {
    /// True for win, lose and draw.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }
}

/// Everything a client needs to re-render after a move.
#[derive(Debug, Clone, Getters)]
pub struct MoveOutcome {
    /// Outcome of the request.
    status: GameStatus,
    /// Board after the human move and any computer reply.
    board: Board,
    /// Human moves made in this game so far.
    moves: u32,
    /// Column the computer played, if it moved.
    computer_move: Option<usize>,
}

/// A freshly started game.
#[derive(Debug, Clone, Getters)]
pub struct GameStart {
    /// Identifier for subsequent move requests.
    game_id: GameId,
    /// The empty starting board.
    board: Board,
}

/// Read-only view of a live game.
#[derive(Debug, Clone, Getters)]
pub struct GameSnapshot {
    /// Session ID.
    game_id: GameId,
    /// Display name of the human player.
    player_name: String,
    /// Human moves made so far.
    moves: u32,
    /// Current board.
    board: Board,
}

/// Errors surfaced to a single request.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum GameError {
    /// No live game has this ID.
    #[display("Game {} not found", _0)]
    #[from(ignore)]
    SessionNotFound(GameId),

    /// The requested column cannot take a stone.
    #[display("Invalid move: {}", _0)]
    InvalidMove(MoveError),

    /// The player name is blank.
    #[display("Player name must not be empty")]
    #[from(ignore)]
    EmptyPlayerName,

    /// Highscore storage failed.
    #[display("{}", _0)]
    PersistenceFailure(DbError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidMove(e) => Some(e),
            GameError::PersistenceFailure(e) => Some(e),
            GameError::SessionNotFound(_) | GameError::EmptyPlayerName => None,
        }
    }
}

/// Game orchestrator.
///
/// Owns the session registry, the computer's column picker and the
/// highscore store. Moves on distinct games run in parallel; moves on the
/// same game are serialized by that session's lock.
#[derive(Debug)]
pub struct GameOrchestrator {
    sessions: SessionRegistry,
    picker: Mutex<Box<dyn ColumnPicker>>,
    highscores: Arc<dyn HighscoreStore>,
}

impl GameOrchestrator {
    /// Creates an orchestrator from its collaborators.
    #[instrument(skip_all)]
    pub fn new(
        sessions: SessionRegistry,
        picker: Box<dyn ColumnPicker>,
        highscores: Arc<dyn HighscoreStore>,
    ) -> Self {
        info!("Creating game orchestrator");
        Self {
            sessions,
            picker: Mutex::new(picker),
            highscores,
        }
    }

    /// Returns the session registry.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Starts a game for `player_name`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyPlayerName`] if the trimmed name is empty.
    #[instrument(skip(self))]
    pub fn start(&self, player_name: &str) -> Result<GameStart, GameError> {
        let name = player_name.trim();
        if name.is_empty() {
            warn!("Rejected start without player name");
            return Err(GameError::EmptyPlayerName);
        }

        let game_id = self.sessions.create(name.to_string());
        info!(game_id = %game_id, player_name = name, "Game started");
        Ok(GameStart {
            game_id,
            board: Board::new(),
        })
    }

    /// Returns the current state of a live game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] for unknown or finished games.
    #[instrument(skip(self))]
    pub fn snapshot(&self, game_id: &str) -> Result<GameSnapshot, GameError> {
        let handle = self
            .sessions
            .get(game_id)
            .ok_or_else(|| GameError::SessionNotFound(game_id.to_string()))?;
        let session = lock_session(&handle);
        if session.is_finished() {
            return Err(GameError::SessionNotFound(game_id.to_string()));
        }

        Ok(GameSnapshot {
            game_id: session.id().clone(),
            player_name: session.player_name().clone(),
            moves: *session.moves(),
            board: session.board().clone(),
        })
    }

    /// Plays the human's stone in `column`, then the computer's reply.
    ///
    /// A rejected move leaves the game untouched. Win, lose and draw remove
    /// the game from the registry; a win also records a highscore. A failing
    /// highscore write is logged and does not fail the move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotFound`] for unknown or finished games
    /// and [`GameError::InvalidMove`] for out-of-range or full columns.
    #[instrument(skip(self))]
    pub fn play_move(&self, game_id: &str, column: i64) -> Result<MoveOutcome, GameError> {
        let handle = self.sessions.get(game_id).ok_or_else(|| {
            warn!(game_id, "Move for unknown game");
            GameError::SessionNotFound(game_id.to_string())
        })?;
        let mut session = lock_session(&handle);

        // Another request may have ended the game while we waited on the lock.
        if session.is_finished() {
            warn!(game_id, "Move for finished game");
            return Err(GameError::SessionNotFound(game_id.to_string()));
        }

        let column = usize::try_from(column)
            .ok()
            .filter(|&c| c < COLS)
            .ok_or(MoveError::ColumnOutOfRange(column))?;
        if !session.board().is_valid_move(column) {
            warn!(game_id, column, "Rejected move into full column");
            return Err(MoveError::ColumnFull(column).into());
        }

        let human = session.board_mut().apply_move(column, Player::Human)?;
        let moves = session.record_human_move();
        debug!(game_id, row = human.row, column, moves, "Human move applied");

        if session.board().check_win(human.row, human.column, Player::Human) {
            let player_name = session.player_name().clone();
            let outcome = self.conclude(game_id, session, GameStatus::Win, moves, None);
            info!(game_id, player_name = %player_name, moves, "Human wins");
            self.record_highscore(&player_name, moves);
            return Ok(outcome);
        }

        let reply = {
            let mut picker = self.picker.lock().unwrap_or_else(PoisonError::into_inner);
            session.board().pick_random_move(picker.as_mut())
        };

        let Some(reply) = reply else {
            info!(game_id, moves, "Board full, draw");
            return Ok(self.conclude(game_id, session, GameStatus::Draw, moves, None));
        };

        let computer = session.board_mut().apply_move(reply, Player::Computer)?;
        debug!(game_id, row = computer.row, column = reply, "Computer move applied");

        if session
            .board()
            .check_win(computer.row, computer.column, Player::Computer)
        {
            info!(game_id, moves, "Computer wins");
            return Ok(self.conclude(game_id, session, GameStatus::Lose, moves, Some(reply)));
        }

        // The human moves first, so the 42nd stone is always the computer's.
        if session.board().is_full() {
            info!(game_id, moves, "Computer filled the board, draw");
            return Ok(self.conclude(game_id, session, GameStatus::Draw, moves, Some(reply)));
        }

        Ok(MoveOutcome {
            status: GameStatus::Ongoing,
            board: session.board().clone(),
            moves,
            computer_move: Some(reply),
        })
    }

    /// Ends a game: marks it finished, releases its lock and drops it from
    /// the registry.
    fn conclude(
        &self,
        game_id: &str,
        mut session: MutexGuard<'_, GameSession>,
        status: GameStatus,
        moves: u32,
        computer_move: Option<usize>,
    ) -> MoveOutcome {
        session.finish();
        let board = session.board().clone();
        drop(session);
        self.sessions.remove(game_id);

        MoveOutcome {
            status,
            board,
            moves,
            computer_move,
        }
    }

    /// Loads the best `limit` highscores.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceFailure`] if the store cannot be read.
    #[instrument(skip(self))]
    pub fn highscores(&self, limit: usize) -> Result<Vec<HighscoreEntry>, GameError> {
        Ok(self.highscores.top(limit)?)
    }

    fn record_highscore(&self, player_name: &str, moves: u32) {
        match self.highscores.record(player_name, moves) {
            Ok(()) => info!(player_name, moves, "Highscore saved"),
            Err(e) => error!(
                kind = %e.kind,
                error = %e,
                player_name,
                moves,
                "Failed to save highscore"
            ),
        }
    }
}
