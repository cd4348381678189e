//! Error types for the feedback relay.

use thiserror::Error;

use crate::mail::OutcomeStatus;

/// Common error type for the feedback relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound submission was malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The mail server rejected the configured credential.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Connecting to or talking with the mail server failed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RelayError {
    /// Classify this error as a dispatch outcome.
    ///
    /// Errors that are neither validation nor authentication failures
    /// count as transport failures.
    pub fn outcome(&self) -> OutcomeStatus {
        match self {
            RelayError::Validation(_) => OutcomeStatus::ValidationFailed,
            RelayError::Authentication(_) => OutcomeStatus::AuthenticationFailed,
            RelayError::Io(_) | RelayError::Config(_) | RelayError::Transport(_) => {
                OutcomeStatus::TransportFailed
            }
        }
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
