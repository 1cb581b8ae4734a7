use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers of the orchestrator.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("expression not found: {0}")]
    NotFound(String),

    #[error("no task available")]
    NoTaskAvailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) | ApiError::NoTaskAvailable => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Arithmetic outcomes that have no defined value.
///
/// These never cross the wire as errors: the agent reports them as a null
/// result, which the orchestrator stores as the NaN sentinel, so the
/// expression is still closed out.
#[derive(Debug, Error, PartialEq)]
pub enum ComputeError {
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,
}

/// Agent-side failures talking to the orchestrator. Always logged and
/// retried, never fatal to the worker loop.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),
}
