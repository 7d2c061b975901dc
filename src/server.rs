//! HTTP API for the browser client.

use crate::db::HighscoreEntry;
use crate::games::connect_four::{COLS, ROWS};
use crate::orchestrator::{GameError, GameOrchestrator, GameStatus};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Board as sent to the client: `0` empty, `1` human, `2` computer.
pub type Grid = [[u8; COLS]; ROWS];

/// Request body for starting a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    /// Display name of the human player.
    pub player_name: String,
}

/// Response body for a started game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameResponse {
    /// Identifier for subsequent move requests.
    pub game_id: String,
    /// The empty board.
    pub board: Grid,
}

/// Request body for a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Column to drop the stone into (0-6).
    pub column: i64,
}

/// Response body for a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    /// Outcome of the move.
    pub status: GameStatus,
    /// Board after the move.
    pub board: Grid,
    /// Human moves made in this game.
    pub moves: u32,
    /// Column the computer answered with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_move: Option<usize>,
}

/// Response body for a game lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    /// Session ID.
    pub game_id: String,
    /// Display name of the human player.
    pub player_name: String,
    /// Human moves made so far.
    pub moves: u32,
    /// Current board.
    pub board: Grid,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// Shared state of the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    orchestrator: Arc<GameOrchestrator>,
    highscore_limit: usize,
}

impl AppState {
    /// Creates handler state around an orchestrator.
    pub fn new(orchestrator: Arc<GameOrchestrator>, highscore_limit: usize) -> Self {
        Self {
            orchestrator,
            highscore_limit,
        }
    }
}

/// Request failure mapped onto an HTTP status.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// Failure from the game layer.
    #[display("{}", _0)]
    Game(GameError),

    /// The request body is not the expected JSON.
    #[display("Malformed request body: {}", _0.body_text())]
    MalformedBody(JsonRejection),

    /// The blocking worker running the request died.
    #[display("Internal error: {}", _0)]
    #[from(ignore)]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Game(GameError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Game(GameError::InvalidMove(_) | GameError::EmptyPlayerName)
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Game(GameError::PersistenceFailure(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            debug!(error = %self, status = %status, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Builds the API router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    info!("Building API router");
    Router::new()
        .route("/health", get(health))
        .route("/api/game/start", post(start_game))
        .route("/api/game/{game_id}", get(get_game))
        .route("/api/game/{game_id}/move", post(make_move))
        .route("/api/highscores", get(highscores))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[instrument(skip(state, payload))]
async fn start_game(
    State(state): State<AppState>,
    payload: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<Json<StartGameResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(player_name = %req.player_name, "Start requested");
    let started = state.orchestrator.start(&req.player_name)?;
    Ok(Json(StartGameResponse {
        game_id: started.game_id().clone(),
        board: started.board().to_grid(),
    }))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let snapshot = state.orchestrator.snapshot(&game_id)?;
    Ok(Json(GameStateResponse {
        game_id: snapshot.game_id().clone(),
        player_name: snapshot.player_name().clone(),
        moves: *snapshot.moves(),
        board: snapshot.board().to_grid(),
    }))
}

#[instrument(skip(state, payload))]
async fn make_move(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(column = req.column, "Move requested");
    let orchestrator = Arc::clone(&state.orchestrator);
    let outcome = tokio::task::spawn_blocking(move || orchestrator.play_move(&game_id, req.column))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    if outcome.status().is_terminal() {
        info!(status = %outcome.status(), moves = outcome.moves(), "Game over");
    }

    Ok(Json(MoveResponse {
        status: *outcome.status(),
        board: outcome.board().to_grid(),
        moves: *outcome.moves(),
        computer_move: *outcome.computer_move(),
    }))
}

#[instrument(skip(state))]
async fn highscores(State(state): State<AppState>) -> Result<Json<Vec<HighscoreEntry>>, ApiError> {
    let orchestrator = Arc::clone(&state.orchestrator);
    let limit = state.highscore_limit;
    let entries = tokio::task::spawn_blocking(move || orchestrator.highscores(limit))
        .await
        .map_err(|e| {
            warn!(error = %e, "Highscore worker failed");
            ApiError::Internal(e.to_string())
        })??;
    Ok(Json(entries))
}
