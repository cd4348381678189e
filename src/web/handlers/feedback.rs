//! Feedback submission handler.

use axum::extract::State;
use std::sync::Arc;

use crate::mail::{Dispatcher, OutcomeStatus};
use crate::web::dto::FeedbackJson;
use crate::web::error::ApiError;

/// Application state shared with handlers.
pub struct AppState {
    /// Sends accepted feedback by mail.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create a new application state.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// POST /feedback - Forward a feedback message by mail.
///
/// Responds 200 with an empty body once the mail server accepted the
/// message, 400 for a malformed submission, and 500 when delivery failed.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    FeedbackJson(submission): FeedbackJson,
) -> Result<OutcomeStatus, ApiError> {
    tracing::info!(length = submission.message.len(), "Got feedback request");

    state.dispatcher.dispatch(&submission.message).await?;

    tracing::info!("Feedback sent successfully");
    Ok(OutcomeStatus::Sent)
}
