//! Outbound mail session traits.
//!
//! A [`SessionConnector`] opens one [`MailSession`] per dispatch. The
//! dispatcher drives the session through authenticate, transmit, and close
//! in that order and never shares a session between requests.

use async_trait::async_trait;

use super::types::{MailCredentials, MailEnvelope};

/// Error raised by a session step.
///
/// The dispatcher classifies failures by step. Only login needs the finer
/// split carried by [`LoginError`].
pub type SessionError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised while logging in.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The server answered the login with a permanent refusal.
    #[error("credentials rejected: {0}")]
    Rejected(SessionError),

    /// The login did not complete: I/O failure, malformed or incomplete
    /// reply, or a transient refusal.
    #[error("{0}")]
    Transport(SessionError),
}

/// Opens outbound mail sessions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Establish a new session with the mail server.
    async fn connect(&self) -> Result<Box<dyn MailSession>, SessionError>;
}

/// A connected outbound mail session.
#[async_trait]
pub trait MailSession: Send {
    /// Log in with the given credential.
    async fn authenticate(&mut self, credentials: &MailCredentials) -> Result<(), LoginError>;

    /// Submit one envelope.
    async fn transmit(&mut self, envelope: &MailEnvelope) -> Result<(), SessionError>;

    /// End the session and release the connection.
    async fn close(&mut self) -> Result<(), SessionError>;
}
