//! API error handling for the feedback endpoint.
//!
//! Callers only ever see one of two fixed JSON bodies. Error details are
//! written to the log when the response is produced.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::mail::OutcomeStatus;
use crate::RelayError;

/// Message returned for rejected submissions.
pub const BAD_REQUEST_MESSAGE: &str = "Bad request!";

/// Message returned for failed deliveries.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error!";

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: &'static str,
}

/// Map an outcome to its HTTP status and optional error body.
pub fn response_parts(outcome: OutcomeStatus) -> (StatusCode, Option<ErrorBody>) {
    match outcome {
        OutcomeStatus::Sent => (StatusCode::OK, None),
        OutcomeStatus::ValidationFailed => (
            StatusCode::BAD_REQUEST,
            Some(ErrorBody {
                error: BAD_REQUEST_MESSAGE,
            }),
        ),
        OutcomeStatus::AuthenticationFailed | OutcomeStatus::TransportFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(ErrorBody {
                error: INTERNAL_ERROR_MESSAGE,
            }),
        ),
    }
}

impl IntoResponse for OutcomeStatus {
    fn into_response(self) -> Response {
        match response_parts(self) {
            (status, Some(body)) => (status, Json(body)).into_response(),
            (status, None) => status.into_response(),
        }
    }
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    outcome: OutcomeStatus,
    detail: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(outcome: OutcomeStatus, detail: impl Into<String>) -> Self {
        Self {
            outcome,
            detail: detail.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(OutcomeStatus::ValidationFailed, detail)
    }

    /// Outcome this error responds with.
    pub fn outcome(&self) -> OutcomeStatus {
        self.outcome
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.outcome {
            OutcomeStatus::ValidationFailed => {
                tracing::warn!(detail = %self.detail, "Rejected feedback request");
            }
            outcome => {
                tracing::error!(?outcome, detail = %self.detail, "Feedback delivery failed");
            }
        }
        self.outcome.into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.outcome, self.detail)
    }
}

impl std::error::Error for ApiError {}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self::new(err.outcome(), err.to_string())
    }
}
