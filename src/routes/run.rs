use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use std::convert::Infallible;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::config::BotConfig;
use crate::error::ConsoleError;
use crate::state::SharedState;

/// POST /run/start
pub async fn start(
    State(state): State<SharedState>,
    Json(config): Json<BotConfig>,
) -> Result<impl IntoResponse, ConsoleError> {
    let status = state.bot.start(config).await?;

    Ok(Json(serde_json::json!({
        "status": "started",
        "run": status,
    })))
}

/// POST /run/stop
pub async fn stop(State(state): State<SharedState>) -> Json<serde_json::Value> {
    if !state.bot.status().is_running {
        return Json(serde_json::json!({
            "status": "not_running",
        }));
    }

    state.bot.stop().await;

    Json(serde_json::json!({
        "status": "stop_requested",
        "message": "Any in-flight action will complete, then the run will stop"
    }))
}

/// POST /run/reset
pub async fn reset(State(state): State<SharedState>) -> Result<impl IntoResponse, ConsoleError> {
    let status = state.bot.reset().await?;

    Ok(Json(serde_json::json!({
        "status": "reset",
        "run": status,
    })))
}

/// GET /run/status
pub async fn status(State(state): State<SharedState>) -> Json<crate::orchestrator::RunStatus> {
    Json(state.bot.status())
}

/// GET /run/stream — SSE of published status snapshots. The watch channel
/// yields the current snapshot immediately, then one event per change.
pub async fn stream(
    State(state): State<SharedState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bot.subscribe();
    let event_stream = WatchStream::new(rx).map(|status| {
        let data = serde_json::to_string(&status).unwrap_or_default();
        Ok(Event::default().event("status").data(data))
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
