//! In-memory registry of live connect-four games.

use crate::games::connect_four::Board;
use derive_getters::Getters;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

/// Opaque identifier of a game session.
pub type GameId = String;

/// Shared handle to one session; lock it to read or mutate the game.
pub type SessionHandle = Arc<Mutex<GameSession>>;

/// One in-progress game against the computer.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Session ID.
    id: GameId,
    /// Display name of the human player.
    player_name: String,
    /// The board.
    board: Board,
    /// Human moves made so far. Computer moves are not counted.
    moves: u32,
    /// Set once a terminal outcome has been reached.
    #[getter(skip)]
    finished: bool,
}

impl GameSession {
    /// Creates a session with an empty board.
    #[instrument]
    pub fn new(id: GameId, player_name: String) -> Self {
        Self {
            id,
            player_name,
            board: Board::new(),
            moves: 0,
            finished: false,
        }
    }

    /// Mutable access to the board.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Counts one human move and returns the new total.
    pub fn record_human_move(&mut self) -> u32 {
        self.moves += 1;
        self.moves
    }

    /// Marks the game as over. Requests still queued on this session's lock
    /// see it as gone.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// True once the game has reached a terminal outcome.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Owns every live session.
///
/// Each session sits behind its own mutex, so moves on one game never wait
/// on another game. The map lock is held only for lookups and inserts.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<GameId, SessionHandle>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<GameId, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new session for `player_name` and returns its fresh ID.
    #[instrument(skip(self))]
    pub fn create(&self, player_name: String) -> GameId {
        let mut sessions = self.map();
        let id = loop {
            let candidate = uuid::Uuid::new_v4().to_string();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = GameSession::new(id.clone(), player_name);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(game_id = %id, active = sessions.len(), "Created new session");
        id
    }

    /// Looks up a session by ID.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let session = self.map().get(id).cloned();
        if session.is_none() {
            debug!(game_id = id, "Session not found");
        }
        session
    }

    /// Removes a session. Returns whether it was present.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.map();
        let removed = sessions.remove(id).is_some();
        if removed {
            info!(game_id = id, active = sessions.len(), "Removed session");
        } else {
            debug!(game_id = id, "Remove ignored, session absent");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    /// True when no games are in progress.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lists all live session IDs.
    #[instrument(skip(self))]
    pub fn list_ids(&self) -> Vec<GameId> {
        let ids: Vec<_> = self.map().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}

/// Locks a session handle, recovering the data if a holder panicked.
pub fn lock_session(handle: &SessionHandle) -> MutexGuard<'_, GameSession> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
