use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Email delivery failure. Logged by the coordinator, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email transport failed: {0}")]
    Transport(String),

    #[error("email delivery timed out after {0}s")]
    Timeout(u64),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("email recipient not configured: {0}")]
    NotConfigured(&'static str),
}

/// Real-time publish failure. Logged by the coordinator, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("no connected sessions for {0}")]
    NoSubscribers(&'static str),
}
