//! SMTP session backed by lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;

use crate::config::SmtpConfig;

use super::session::{LoginError, MailSession, SessionConnector, SessionError};
use super::types::{MailCredentials, MailEnvelope};

/// Opens SMTP sessions to a single mail server.
///
/// When `secure` is set the whole session runs over implicit TLS.
/// Otherwise the connection is upgraded with STARTTLS if the server
/// offers it.
#[derive(Debug, Clone)]
pub struct SmtpConnector {
    host: String,
    port: u16,
    secure: bool,
    timeout: Duration,
    hello_name: ClientId,
}

impl SmtpConnector {
    /// Create a connector from the SMTP configuration.
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            secure: config.secure,
            timeout: config.timeout(),
            hello_name: ClientId::default(),
        }
    }

    /// Server endpoint as `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn tls_parameters(&self) -> Result<TlsParameters, SessionError> {
        Ok(TlsParameters::new(self.host.clone())?)
    }
}

#[async_trait]
impl SessionConnector for SmtpConnector {
    async fn connect(&self) -> Result<Box<dyn MailSession>, SessionError> {
        let implicit_tls = if self.secure {
            Some(self.tls_parameters()?)
        } else {
            None
        };

        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (self.host.as_str(), self.port),
            Some(self.timeout),
            &self.hello_name,
            implicit_tls,
            None,
        )
        .await?;

        if connection.can_starttls() {
            tracing::debug!(server = %self.endpoint(), "Upgrading connection with STARTTLS");
            if let Err(e) = connection
                .starttls(self.tls_parameters()?, &self.hello_name)
                .await
            {
                connection.abort().await;
                return Err(e.into());
            }
        }

        Ok(Box::new(SmtpSession { connection }))
    }
}

/// Only a permanent (5xx) reply counts as a refused credential.
fn login_error(e: lettre::transport::smtp::Error) -> LoginError {
    if e.is_permanent() {
        LoginError::Rejected(e.into())
    } else {
        LoginError::Transport(e.into())
    }
}

/// One SMTP connection.
struct SmtpSession {
    connection: AsyncSmtpConnection,
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn authenticate(&mut self, credentials: &MailCredentials) -> Result<(), LoginError> {
        let credentials = Credentials::new(credentials.user.clone(), credentials.secret.clone());
        self.connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &credentials)
            .await
            .map_err(login_error)?;
        Ok(())
    }

    async fn transmit(&mut self, envelope: &MailEnvelope) -> Result<(), SessionError> {
        let message = envelope.to_message()?;
        self.connection
            .send(message.envelope(), &message.formatted())
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.connection.has_broken() {
            self.connection.abort().await;
            return Ok(());
        }
        let result = self.connection.quit().await;
        if result.is_err() {
            self.connection.abort().await;
        }
        result?;
        Ok(())
    }
}
