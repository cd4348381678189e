//! Feedback mail dispatcher.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lettre::message::Mailbox;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::{RelayError, Result};

use super::session::{LoginError, MailSession, SessionConnector, SessionError};
use super::smtp::SmtpConnector;
use super::types::{MailCredentials, MailEnvelope};

/// Why a bounded session step did not complete.
enum StepFailure<E = SessionError> {
    TimedOut(Duration),
    Failed(E),
}

impl<E: fmt::Display> fmt::Display for StepFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepFailure::TimedOut(limit) => write!(f, "timed out after {}s", limit.as_secs()),
            StepFailure::Failed(e) => write!(f, "{e}"),
        }
    }
}

async fn bounded<T, E, F>(limit: Duration, step: F) -> std::result::Result<T, StepFailure<E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StepFailure::Failed(e)),
        Err(_) => Err(StepFailure::TimedOut(limit)),
    }
}

/// Sends feedback messages to the configured recipient.
///
/// Every dispatch opens its own session, so concurrent dispatches never
/// share protocol state. The session is closed on every exit path once it
/// has been established.
pub struct Dispatcher {
    connector: Arc<dyn SessionConnector>,
    credentials: MailCredentials,
    from: Mailbox,
    to: Mailbox,
    subject: String,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over an arbitrary session connector.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the sender or recipient address
    /// does not parse.
    pub fn new(config: &Config, connector: Arc<dyn SessionConnector>) -> Result<Self> {
        Ok(Self {
            connector,
            credentials: MailCredentials::new(&config.smtp.user, &config.smtp.password),
            from: config.message.sender_mailbox()?,
            to: config.message.recipient_mailbox()?,
            subject: config.message.subject.clone(),
            timeout: config.smtp.timeout(),
        })
    }

    /// Create a dispatcher that talks SMTP to the configured server.
    pub fn smtp(config: &Config) -> Result<Self> {
        let connector = SmtpConnector::new(&config.smtp);
        let endpoint = connector.endpoint();
        let dispatcher = Self::new(config, Arc::new(connector))?;
        info!(server = %endpoint, secure = config.smtp.secure, "Mailing instance ready");
        Ok(dispatcher)
    }

    /// Build the envelope for one message.
    pub fn envelope(&self, message: &str) -> MailEnvelope {
        MailEnvelope {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: message.to_string(),
        }
    }

    /// Send one feedback message.
    ///
    /// Connect, authenticate, transmit, and close run strictly in that
    /// order, each bounded by the configured timeout. Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Transport`] if the connection cannot be established,
    ///   any step times out, or the server rejects the message
    /// - [`RelayError::Authentication`] if the server permanently refuses the
    ///   credential
    pub async fn dispatch(&self, message: &str) -> Result<()> {
        let mut session = bounded(self.timeout, self.connector.connect())
            .await
            .map_err(|e| RelayError::Transport(format!("connection failed: {e}")))?;
        info!("Connection OK");

        let result = self.deliver(&mut *session, message).await;
        self.close(&mut *session).await;
        result
    }

    async fn deliver(&self, session: &mut dyn MailSession, message: &str) -> Result<()> {
        bounded(self.timeout, session.authenticate(&self.credentials))
            .await
            .map_err(|e| match e {
                StepFailure::TimedOut(_) => RelayError::Transport(format!("login {e}")),
                StepFailure::Failed(LoginError::Rejected(_)) => {
                    RelayError::Authentication(format!("login failed: {e}"))
                }
                StepFailure::Failed(LoginError::Transport(_)) => {
                    RelayError::Transport(format!("login failed: {e}"))
                }
            })?;
        info!(user = %self.credentials.user, "Login OK");

        let envelope = self.envelope(message);
        bounded(self.timeout, session.transmit(&envelope))
            .await
            .map_err(|e| RelayError::Transport(format!("send failed: {e}")))?;
        info!(to = %envelope.to, "Sending OK");

        Ok(())
    }

    async fn close(&self, session: &mut dyn MailSession) {
        match bounded(self.timeout, session.close()).await {
            Ok(()) => debug!("Connection closed OK"),
            Err(e) => warn!(error = %e, "Failed to close mail session cleanly"),
        }
    }
}
