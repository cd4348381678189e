//! Validating extractors for Web API requests.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::feedback::FeedbackSubmission;
use crate::web::error::ApiError;

/// A JSON extractor that yields a validated feedback submission.
///
/// Bodies that are not JSON, are sent without a JSON content type, or do
/// not carry a string `message` field are all rejected as bad requests
/// before the handler runs.
///
/// # Example
///
/// ```ignore
/// use feedback_relay::web::dto::FeedbackJson;
///
/// async fn submit(FeedbackJson(submission): FeedbackJson) {
///     // submission.message is present and is a string
/// }
/// ```
pub struct FeedbackJson(pub FeedbackSubmission);

#[async_trait]
impl<S> FromRequest<S> for FeedbackJson
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        let submission = FeedbackSubmission::from_body(&body)?;

        Ok(FeedbackJson(submission))
    }
}
