//! Feedback submission validation.

use serde_json::Value;

use crate::{RelayError, Result};

/// An accepted feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    /// Free-text feedback message.
    pub message: String,
}

impl FeedbackSubmission {
    /// Extract a submission from a parsed request body.
    ///
    /// The only requirement is that `message` is present and is a string.
    /// Its content is not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] if the body is not an object, or
    /// `message` is missing, null, or not a string.
    pub fn from_body(body: &Value) -> Result<Self> {
        let fields = body
            .as_object()
            .ok_or_else(|| RelayError::Validation("request body is not an object".to_string()))?;

        match fields.get("message") {
            Some(Value::String(message)) => Ok(Self {
                message: message.clone(),
            }),
            Some(Value::Null) | None => {
                Err(RelayError::Validation("missing message field".to_string()))
            }
            Some(_) => Err(RelayError::Validation(
                "message field is not a string".to_string(),
            )),
        }
    }
}
