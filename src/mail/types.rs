//! Mail types for the feedback relay.

use std::fmt;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::Message;

use crate::{RelayError, Result};

/// Terminal classification of one feedback submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// The message was accepted by the mail server.
    Sent,
    /// The inbound submission was malformed.
    ValidationFailed,
    /// The mail server rejected the configured credential.
    AuthenticationFailed,
    /// Connecting, sending, or waiting on the mail server failed.
    TransportFailed,
}

/// Login credential for the outbound mail session.
#[derive(Clone)]
pub struct MailCredentials {
    /// User name.
    pub user: String,
    /// Secret.
    pub secret: String,
}

impl MailCredentials {
    /// Create a new credential pair.
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One outgoing feedback mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    /// Sender, optionally with a display name.
    pub from: Mailbox,
    /// Recipient.
    pub to: Mailbox,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl MailEnvelope {
    /// Build the RFC 5322 message for this envelope.
    pub fn to_message(&self) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .map_err(|e| RelayError::Transport(format!("failed to build message: {e}")))
    }
}
