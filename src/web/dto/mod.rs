//! Data Transfer Objects for Web API.

pub mod validation;

pub use validation::FeedbackJson;
