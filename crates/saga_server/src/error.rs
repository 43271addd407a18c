//! Mapping of Saga errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use saga_error::{NarrativeErrorKind, SagaError, SagaErrorKind};
use serde_json::json;
use tracing::{error, warn};

/// An error rendered as `{"error": "..."}` with a matching status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Create an error response.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        match err.kind() {
            SagaErrorKind::Narrative(e) => {
                let status = match &e.kind {
                    NarrativeErrorKind::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    NarrativeErrorKind::SessionTerminated { .. }
                    | NarrativeErrorKind::SessionNotStarted(_)
                    | NarrativeErrorKind::SessionAlreadyStarted(_) => StatusCode::CONFLICT,
                    NarrativeErrorKind::MessageAssembly(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                Self::new(status, e.kind.to_string())
            }
            SagaErrorKind::Gateway(e) => Self::new(
                StatusCode::BAD_GATEWAY,
                format!("Story generation failed: {}", e.kind),
            ),
            SagaErrorKind::Config(_) | SagaErrorKind::Server(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
