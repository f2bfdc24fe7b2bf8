//! Error responses for the HTTP endpoints.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::judge::{JudgeError, JudgeErrorKind};
use crate::leaderboard::{StoreError, StoreErrorKind};

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// An error answered with a status code and an [`ErrorBody`].
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error response.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 405 Method Not Allowed.
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Maps a body rejection: unparseable JSON and missing or mistyped
    /// fields get their own messages.
    pub fn from_rejection(rejection: &JsonRejection, missing_fields: &str) -> Self {
        warn!(error = %rejection, "Rejected request body");
        match rejection {
            JsonRejection::JsonSyntaxError(_) => Self::bad_request("Invalid JSON in request body"),
            JsonRejection::MissingJsonContentType(_) => {
                Self::bad_request("Expected a JSON request body")
            }
            _ => Self::bad_request(missing_fields),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<JudgeError> for ApiError {
    fn from(err: JudgeError) -> Self {
        error!(error = %err, "Judge call failed");
        match err.kind {
            JudgeErrorKind::Network => Self::internal("Failed to check word"),
            JudgeErrorKind::UpstreamRejected => Self::internal("Error from LLM API"),
            JudgeErrorKind::InvalidResponse => Self::internal("Invalid reply from LLM API"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::InvalidEntry => Self::bad_request(err.message),
            StoreErrorKind::Unavailable => {
                error!(error = %err, "Leaderboard store failed");
                Self::internal("Internal server error")
            }
        }
    }
}
