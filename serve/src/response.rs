//! JSON error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use vibe::AnchorError;

/// Handler error, rendered as `{"error": "<message>"}` with a matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request itself is unusable (400).
    #[error("{0}")]
    BadRequest(String),
    /// Server-side misconfiguration, e.g. no anchors (500).
    #[error("{0}")]
    Internal(String),
    /// The embeddings provider failed or returned unusable data (502).
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AnchorError> for ApiError {
    fn from(e: AnchorError) -> Self {
        let message = e.to_string();
        match e {
            AnchorError::EmptyTerm => ApiError::BadRequest(message),
            AnchorError::NoAnchors | AnchorError::DuplicateLabel(_) => ApiError::Internal(message),
            AnchorError::Embedding(_)
            | AnchorError::CountMismatch { .. }
            | AnchorError::EmptyVector { .. }
            | AnchorError::DimensionMismatch { .. } => ApiError::Upstream(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
