use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
#[allow(dead_code)]
pub enum ConsoleError {
    #[error("A run is already active")]
    AlreadyRunning,

    #[error("Cannot reset while a run is active")]
    StillRunning,

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = match &self {
            ConsoleError::AlreadyRunning => StatusCode::CONFLICT,
            ConsoleError::StillRunning => StatusCode::CONFLICT,
            ConsoleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConsoleError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ConsoleError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
