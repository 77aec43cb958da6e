use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::orchestrator::{RunPhase, RunStatus};
use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub run: RunStatus,
    pub buffered_logs: usize,
    pub console: ConsoleInfo,
}

#[derive(Serialize)]
pub struct ConsoleInfo {
    pub version: String,
    pub port: u16,
}

/// Overall status string for the dashboard header. Pure function,
/// extracted for testability.
pub fn determine_overall_status(phase: RunPhase) -> &'static str {
    match phase {
        RunPhase::Idle => "idle",
        RunPhase::Stopped => "stopped",
        _ => "running",
    }
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let run = state.bot.status();
    Json(HealthResponse {
        status: determine_overall_status(run.phase),
        buffered_logs: state.logs.len().await,
        run,
        console: ConsoleInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            port: state.config.port,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status_mapping() {
        assert_eq!(determine_overall_status(RunPhase::Idle), "idle");
        assert_eq!(determine_overall_status(RunPhase::Stopped), "stopped");
        assert_eq!(determine_overall_status(RunPhase::Starting), "running");
        assert_eq!(determine_overall_status(RunPhase::Processing), "running");
    }
}
