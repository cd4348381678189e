//! Feedback relay
//!
//! Receives feedback messages over HTTP and forwards each one as an email
//! to a fixed recipient through an authenticated SMTP session.

pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod mail;
pub mod web;

pub use config::Config;
pub use error::{RelayError, Result};
pub use feedback::FeedbackSubmission;
pub use mail::{Dispatcher, MailEnvelope, OutcomeStatus};
pub use web::WebServer;
