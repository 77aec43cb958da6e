use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::util::ServiceExt;

use feedbot_console::config::{ActionMode, BotConfig, ConsoleConfig, DEFAULT_CONSOLE_PORT};
use feedbot_console::executor::SimulatedExecutor;
use feedbot_console::log_buffer::LogLevel;
use feedbot_console::server::build_router;
use feedbot_console::state::{ConsoleState, SharedState};

fn make_state(data_dir: &std::path::Path) -> SharedState {
    let config = ConsoleConfig {
        port: DEFAULT_CONSOLE_PORT,
        data_dir: data_dir.to_path_buf(),
        log_file: None,
    };
    Arc::new(ConsoleState::new(
        config,
        BotConfig::default(),
        Arc::new(SimulatedExecutor::new()),
    ))
}

fn start_body(iterations: u32) -> Body {
    let config = BotConfig {
        mode: ActionMode::Like,
        iterations,
        // Long enough that nothing completes while a test is looking
        interval_ms: 60_000,
        ..BotConfig::default()
    };
    Body::from(serde_json::to_vec(&config).unwrap())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- Health / status ---

#[tokio::test]
async fn test_health_reports_idle_initially() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_router(make_state(dir.path()));

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "idle");
    assert_eq!(json["run"]["phase"], "idle");
    assert_eq!(json["buffered_logs"], 0);
}

#[tokio::test]
async fn test_run_status_starts_idle() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_router(make_state(dir.path()));

    let response = router
        .oneshot(Request::get("/run/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["phase"], "idle");
    assert_eq!(json["is_running"], false);
    assert_eq!(json["progress_percent"], 0.0);
}

// --- Run control ---

#[tokio::test]
async fn test_second_start_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    let router = build_router(state.clone());

    let first = router
        .clone()
        .oneshot(
            Request::post("/run/start")
                .header(header::CONTENT_TYPE, "application/json")
                .body(start_body(5))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["status"], "started");
    assert_eq!(json["run"]["phase"], "starting");

    let second = router
        .clone()
        .oneshot(
            Request::post("/run/start")
                .header(header::CONTENT_TYPE, "application/json")
                .body(start_body(3))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["error"], "A run is already active");

    state.bot.stop().await;
}

#[tokio::test]
async fn test_zero_iterations_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_router(make_state(dir.path()));

    let response = router
        .oneshot(
            Request::post("/run/start")
                .header(header::CONTENT_TYPE, "application/json")
                .body(start_body(0))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stop_without_a_run_reports_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_router(make_state(dir.path()));

    let response = router
        .oneshot(Request::post("/run/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "not_running");
}

#[tokio::test]
async fn test_reset_conflicts_while_running_then_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    let router = build_router(state.clone());

    let started = router
        .clone()
        .oneshot(
            Request::post("/run/start")
                .header(header::CONTENT_TYPE, "application/json")
                .body(start_body(5))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(started.status(), StatusCode::OK);

    let rejected = router
        .clone()
        .oneshot(Request::post("/run/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::CONFLICT);

    state.bot.stop().await;
    let mut rx = state.bot.subscribe();
    rx.wait_for(|s| !s.is_running).await.unwrap();

    let accepted = router
        .clone()
        .oneshot(Request::post("/run/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    let json = body_json(accepted).await;
    assert_eq!(json["run"]["phase"], "idle");
    assert_eq!(json["run"]["completed_iterations"], 0);
}

// --- Logs ---

#[tokio::test]
async fn test_log_history_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    let router = build_router(state.clone());

    state.logs.append(LogLevel::Info, "older", None).await;
    state.logs.append(LogLevel::Success, "newer", None).await;

    let response = router
        .clone()
        .oneshot(
            Request::get("/logs/history?limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
    assert_eq!(json["entries"][0]["message"], "newer");

    let cleared = router
        .clone()
        .oneshot(Request::post("/logs/clear").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(cleared.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(Request::get("/logs/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

// --- Persisted configuration ---

#[tokio::test]
async fn test_config_round_trip_persists() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(Request::get("/config").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["mode"], "like");

    let mut updated = BotConfig::default();
    updated.mode = ActionMode::Comment;
    updated.iterations = 3;
    let put = router
        .clone()
        .oneshot(
            Request::put("/config")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&updated).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(put.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(Request::get("/config").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["mode"], "comment");
    assert_eq!(json["iterations"], 3);

    // Written through to disk
    assert!(dir.path().join("bot-config.json").exists());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_router(make_state(dir.path()));

    let response = router
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
