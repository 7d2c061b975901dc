//! End-to-end tests for the HTTP API, driven through the router in-process.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use vier_gewinnt::{
    AppState, GameOrchestrator, HighscoreStore, InMemoryHighscores, ScriptedPicker,
    SessionRegistry, router,
};

struct TestApp {
    router: Router,
    store: Arc<InMemoryHighscores>,
    sessions: SessionRegistry,
}

fn app(computer: impl IntoIterator<Item = usize>, highscore_limit: usize) -> TestApp {
    let store = Arc::new(InMemoryHighscores::new());
    let sessions = SessionRegistry::new();
    let orchestrator = GameOrchestrator::new(
        sessions.clone(),
        Box::new(ScriptedPicker::new(computer)),
        store.clone(),
    );
    let state = AppState::new(Arc::new(orchestrator), highscore_limit);
    TestApp {
        router: router(state),
        store,
        sessions,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn start(router: &Router, name: &str) -> String {
    let (status, body) = post(router, "/api/game/start", json!({ "playerName": name })).await;
    assert_eq!(status, StatusCode::OK);
    body["gameId"].as_str().unwrap().to_string()
}

async fn play(router: &Router, game_id: &str, column: i64) -> (StatusCode, Value) {
    post(
        router,
        &format!("/api/game/{}/move", game_id),
        json!({ "column": column }),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = app([], 10);
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_start_returns_id_and_empty_board() {
    let app = app([], 10);
    let (status, body) = post(&app.router, "/api/game/start", json!({ "playerName": "Ada" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["gameId"].as_str().unwrap().is_empty());
    assert_eq!(body["board"], serde_json::to_value([[0u8; 7]; 6]).unwrap());
    assert_eq!(app.sessions.len(), 1);
}

#[tokio::test]
async fn test_start_rejects_blank_name() {
    let app = app([], 10);
    let (status, body) = post(&app.router, "/api/game/start", json!({ "playerName": "  " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_move_returns_board_and_computer_reply() {
    let app = app([4], 10);
    let id = start(&app.router, "Ada").await;

    let (status, body) = play(&app.router, &id, 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ongoing");
    assert_eq!(body["computerMove"], 4);
    assert_eq!(body["moves"], 1);
    assert_eq!(body["board"][5], json!([0, 0, 0, 1, 2, 0, 0]));
}

#[tokio::test]
async fn test_out_of_range_column_is_bad_request() {
    let app = app([4], 10);
    let id = start(&app.router, "Ada").await;

    let (status, body) = play(&app.router, &id, 7).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains('7'));

    // The game survives the rejected move.
    let (status, body) = get(&app.router, &format!("/api/game/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moves"], 0);
    assert_eq!(body["playerName"], "Ada");
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let app = app([], 10);

    let (status, body) = play(&app.router, "does-not-exist", 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = get(&app.router, "/api/game/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_win_ends_game_and_records_highscore() {
    let app = app([0, 0, 0], 10);
    let id = start(&app.router, "Ada").await;

    for _ in 0..3 {
        let (status, body) = play(&app.router, &id, 3).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ongoing");
    }

    let (status, body) = play(&app.router, &id, 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "win");
    assert_eq!(body["moves"], 4);
    assert!(body.get("computerMove").is_none());

    let (status, _) = play(&app.router, &id, 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app.router, "/api/highscores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "player_name": "Ada", "moves": 4 }]));
}

#[tokio::test]
async fn test_highscores_sorted_and_limited() {
    let app = app([], 10);
    for (i, moves) in [9, 4, 12, 7, 5, 20, 4, 11, 8, 6, 15, 10].into_iter().enumerate() {
        app.store.record(&format!("P{}", i), moves).unwrap();
    }

    let (status, body) = get(&app.router, "/api/highscores").await;
    assert_eq!(status, StatusCode::OK);

    let moves: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["moves"].as_u64().unwrap())
        .collect();
    assert_eq!(moves, vec![4, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    assert_eq!(body[0]["player_name"], "P1");
    assert_eq!(body[1]["player_name"], "P6");
}

#[tokio::test]
async fn test_highscores_empty() {
    let app = app([], 10);
    let (status, body) = get(&app.router, "/api/highscores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_move_body_is_bad_request() {
    let app = app([4], 10);
    let id = start(&app.router, "Ada").await;
    let uri = format!("/api/game/{}/move", id);
    play(&app.router, &id, 3).await;

    for body in [json!({ "column": "x" }), json!({}), json!({ "column": 2.5 })] {
        let (status, response) = post(&app.router, &uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }

    let (status, response) = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri(&uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"column\":"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());

    // Rejected bodies never reach the game.
    let (_, game) = get(&app.router, &format!("/api/game/{}", id)).await;
    assert_eq!(game["moves"], 1);
}

#[tokio::test]
async fn test_malformed_start_body_is_bad_request() {
    let app = app([], 10);

    let (status, body) = post(&app.router, "/api/game/start", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app.router,
        Request::builder()
            .method("POST")
            .uri("/api/game/start")
            .body(Body::from("playerName=Ada"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(app.sessions.is_empty());
}
