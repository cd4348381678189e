//! Configuration module for the feedback relay.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::Address;
use serde::Deserialize;

use crate::{RelayError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    54521
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Outbound SMTP session configuration.
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    /// Mail server host name.
    #[serde(default)]
    pub host: String,
    /// Mail server port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Use implicit TLS for the whole session.
    #[serde(default = "default_smtp_secure")]
    pub secure: bool,
    /// Login user name.
    #[serde(default)]
    pub user: String,
    /// Login secret.
    #[serde(default)]
    pub password: String,
    /// Timeout applied to each outbound step, in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_port() -> u16 {
    465
}

fn default_smtp_secure() -> bool {
    true
}

fn default_smtp_timeout() -> u64 {
    30
}

impl SmtpConfig {
    /// Per-step timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            secure: default_smtp_secure(),
            user: String::new(),
            password: String::new(),
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Outgoing message configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// Envelope sender address.
    #[serde(default)]
    pub sender_address: String,
    /// Display name shown next to the sender address.
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Address every feedback message is delivered to.
    #[serde(default)]
    pub recipient_address: String,
    /// Subject line of every feedback message.
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_subject() -> String {
    "Feedback".to_string()
}

impl MessageConfig {
    /// Sender mailbox, with the display name when one is configured.
    pub fn sender_mailbox(&self) -> Result<Mailbox> {
        let address = parse_address("sender_address", &self.sender_address)?;
        let name = self
            .sender_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(Mailbox::new(name, address))
    }

    /// Recipient mailbox.
    pub fn recipient_mailbox(&self) -> Result<Mailbox> {
        let address = parse_address("recipient_address", &self.recipient_address)?;
        Ok(Mailbox::new(None, address))
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| RelayError::Config(format!("invalid {field} {value:?}: {e}")))
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            sender_address: String::new(),
            sender_name: None,
            recipient_address: String::new(),
            subject: default_subject(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/feedback.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound SMTP session configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Outgoing message configuration.
    #[serde(default)]
    pub message: MessageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: HTTP listen port
    /// - `FEEDBACK_SMTP_HOST`, `FEEDBACK_SMTP_PORT`, `FEEDBACK_SMTP_SECURE`
    /// - `FEEDBACK_SMTP_USER`, `FEEDBACK_SMTP_PASSWORD`
    /// - `FEEDBACK_SENDER_ADDRESS`, `FEEDBACK_SENDER_NAME`
    /// - `FEEDBACK_RECIPIENT_ADDRESS`, `FEEDBACK_SUBJECT`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values and values that fail to parse are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(host) = var("FEEDBACK_SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = var("FEEDBACK_SMTP_PORT").and_then(|v| v.trim().parse().ok()) {
            self.smtp.port = port;
        }
        if let Some(secure) = var("FEEDBACK_SMTP_SECURE").and_then(|v| parse_bool(&v)) {
            self.smtp.secure = secure;
        }
        if let Some(user) = var("FEEDBACK_SMTP_USER") {
            self.smtp.user = user;
        }
        if let Some(password) = var("FEEDBACK_SMTP_PASSWORD") {
            self.smtp.password = password;
        }
        if let Some(address) = var("FEEDBACK_SENDER_ADDRESS") {
            self.message.sender_address = address;
        }
        if let Some(name) = var("FEEDBACK_SENDER_NAME") {
            self.message.sender_name = Some(name);
        }
        if let Some(address) = var("FEEDBACK_RECIPIENT_ADDRESS") {
            self.message.recipient_address = address;
        }
        if let Some(subject) = var("FEEDBACK_SUBJECT") {
            self.message.subject = subject;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - SMTP host or user is empty
    /// - Sender or recipient address does not parse
    pub fn validate(&self) -> Result<()> {
        if self.smtp.host.trim().is_empty() {
            return Err(RelayError::Config(
                "smtp.host is not set. \
                 Set it in config.toml or via FEEDBACK_SMTP_HOST environment variable."
                    .to_string(),
            ));
        }
        if self.smtp.user.trim().is_empty() {
            return Err(RelayError::Config(
                "smtp.user is not set. \
                 Set it in config.toml or via FEEDBACK_SMTP_USER environment variable."
                    .to_string(),
            ));
        }
        if self.smtp.timeout_secs == 0 {
            return Err(RelayError::Config(
                "smtp.timeout_secs must be at least 1".to_string(),
            ));
        }
        self.message.sender_mailbox()?;
        self.message.recipient_mailbox()?;
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
