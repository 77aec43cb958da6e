use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(crate::routes::health::health))
        // Run control
        .route("/run/start", post(crate::routes::run::start))
        .route("/run/stop", post(crate::routes::run::stop))
        .route("/run/reset", post(crate::routes::run::reset))
        .route("/run/status", get(crate::routes::run::status))
        .route("/run/stream", get(crate::routes::run::stream))
        // Logs
        .route("/logs/history", get(crate::routes::logs::history))
        .route("/logs/stream", get(crate::routes::logs::stream))
        .route("/logs/clear", post(crate::routes::logs::clear))
        // Persisted bot configuration
        .route(
            "/config",
            get(crate::routes::config::get_config).put(crate::routes::config::put_config),
        )
        // Live event feed
        .route("/ws", get(crate::routes::ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
