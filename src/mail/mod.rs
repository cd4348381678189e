//! Outbound mail module.
//!
//! This module turns accepted feedback into email:
//! - Envelope construction from the configured sender, recipient, and subject
//! - Session lifecycle (connect, login, send, close) with per-step timeouts
//! - SMTP sessions backed by lettre

mod dispatcher;
mod session;
mod smtp;
mod types;

pub use dispatcher::Dispatcher;
pub use session::{LoginError, MailSession, SessionConnector, SessionError};
pub use smtp::SmtpConnector;
pub use types::{MailCredentials, MailEnvelope, OutcomeStatus};
