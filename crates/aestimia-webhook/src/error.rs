//! # Webhook Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps client and workflow errors to HTTP status codes with a JSON body
//! carrying an error code and message.

use aestimia_client::AestimiaError;
use aestimia_core::{CoreError, WorkflowError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Failures while handling a review notification.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The notification or the submission it names is unusable (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The review service failed or returned something unreadable (502).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The caller's review handler failed (500).
    #[error("review handler failed: {0}")]
    Handler(String),

    /// Anything else (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Handler(_) => (StatusCode::INTERNAL_SERVER_ERROR, "HANDLER_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) | Self::Handler(_) => {
                tracing::error!(error = %self, "webhook failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AestimiaError> for WebhookError {
    fn from(err: AestimiaError) -> Self {
        match err {
            AestimiaError::Core(CoreError::Workflow(
                WorkflowError::NotYetSubmitted | WorkflowError::InvalidIdentifier { .. },
            ))
            | AestimiaError::Core(CoreError::Validation(_)) => Self::BadRequest(err.to_string()),
            AestimiaError::Transport(_) | AestimiaError::InvalidRecord { .. } => {
                Self::Upstream(err.to_string())
            }
            AestimiaError::Core(_) | AestimiaError::Config(_) | AestimiaError::Encode(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
