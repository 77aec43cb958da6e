use axum::extract::State;
use axum::Json;

use crate::config::BotConfig;
use crate::settings::{save_settings, settings_path};
use crate::state::SharedState;

/// GET /config — the persisted bot configuration.
pub async fn get_config(State(state): State<SharedState>) -> Json<BotConfig> {
    Json(state.settings.read().await.clone())
}

/// PUT /config — persist a new bot configuration. Stored as given; the
/// form owns field-level validation, the orchestrator enforces its own
/// preconditions at start.
pub async fn put_config(
    State(state): State<SharedState>,
    Json(config): Json<BotConfig>,
) -> Json<serde_json::Value> {
    let path = settings_path(&state.config);
    save_settings(&path, &config);

    let mut settings = state.settings.write().await;
    *settings = config;

    Json(serde_json::json!({
        "status": "saved",
    }))
}
