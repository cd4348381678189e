//! Test helpers for integration tests.
//!
//! Provides a scripted loopback SMTP server and configuration builders.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use base64::Engine;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use feedback_relay::Config;

/// User name the fake server accepts.
pub const SMTP_USER: &str = "relay";

/// Secret the fake server accepts.
pub const SMTP_PASSWORD: &str = "secret";

/// How the fake SMTP server answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Behavior {
    /// Reject every login attempt with 535.
    pub reject_login: bool,
    /// Reject the message after DATA with 554.
    pub reject_message: bool,
    /// Hang up after reading AUTH without replying.
    pub hang_up_on_login: bool,
}

/// What the fake SMTP server observed.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    /// Number of accepted TCP connections.
    pub connections: usize,
    /// Decoded `(user, password)` pairs from AUTH PLAIN.
    pub logins: Vec<(String, String)>,
    /// Number of DATA commands received.
    pub data_commands: usize,
    /// Raw message contents accepted or rejected after DATA.
    pub messages: Vec<String>,
    /// Number of QUIT commands received.
    pub quits: usize,
}

/// A scripted SMTP server listening on loopback.
pub struct FakeSmtpServer {
    addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeSmtpServer {
    /// Start the server on a random port.
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let state = recorded.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                state.lock().unwrap().connections += 1;
                let state = state.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, behavior, state).await;
                });
            }
        });

        Self { addr, recorded }
    }

    /// Port the server listens on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Snapshot of everything observed so far.
    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }
}

async fn serve(
    stream: TcpStream,
    behavior: Behavior,
    state: Arc<Mutex<Recorded>>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    writer.write_all(b"220 localhost ESMTP fake\r\n").await?;

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let command = line.trim_end().to_string();
        let upper = command.to_ascii_uppercase();

        if upper.starts_with("EHLO") || upper.starts_with("HELO") {
            writer
                .write_all(b"250-localhost\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n")
                .await?;
        } else if upper.starts_with("AUTH PLAIN ") {
            let (user, password) = decode_plain(&command["AUTH PLAIN ".len()..]);
            let accepted =
                !behavior.reject_login && user == SMTP_USER && password == SMTP_PASSWORD;
            state.lock().unwrap().logins.push((user, password));
            if behavior.hang_up_on_login {
                return Ok(());
            }
            if accepted {
                writer
                    .write_all(b"235 2.7.0 Authentication successful\r\n")
                    .await?;
            } else {
                writer
                    .write_all(b"535 5.7.8 Authentication credentials invalid\r\n")
                    .await?;
            }
        } else if upper.starts_with("MAIL FROM") || upper.starts_with("RCPT TO") {
            writer.write_all(b"250 2.1.0 OK\r\n").await?;
        } else if upper == "DATA" {
            state.lock().unwrap().data_commands += 1;
            writer
                .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                .await?;

            let mut content = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).await? == 0 {
                    return Ok(());
                }
                if line == ".\r\n" {
                    break;
                }
                content.push_str(&line);
            }
            state.lock().unwrap().messages.push(content);

            if behavior.reject_message {
                writer.write_all(b"554 5.6.0 Message rejected\r\n").await?;
            } else {
                writer.write_all(b"250 2.0.0 Queued\r\n").await?;
            }
        } else if upper == "QUIT" {
            state.lock().unwrap().quits += 1;
            writer.write_all(b"221 2.0.0 Bye\r\n").await?;
            return Ok(());
        } else if upper == "NOOP" || upper == "RSET" {
            writer.write_all(b"250 2.0.0 OK\r\n").await?;
        } else {
            writer
                .write_all(b"502 5.5.2 Command not implemented\r\n")
                .await?;
        }
    }
}

fn decode_plain(encoded: &str) -> (String, String) {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .unwrap_or_default();
    let decoded = String::from_utf8_lossy(&decoded).into_owned();
    let mut parts = decoded.split('\0').skip(1);
    let user = parts.next().unwrap_or_default().to_string();
    let password = parts.next().unwrap_or_default().to_string();
    (user, password)
}

/// A loopback port with nothing listening on it.
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Configuration pointing at a plaintext SMTP server on loopback.
pub fn test_config(smtp_port: u16) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.smtp.host = "127.0.0.1".to_string();
    config.smtp.port = smtp_port;
    config.smtp.secure = false;
    config.smtp.user = SMTP_USER.to_string();
    config.smtp.password = SMTP_PASSWORD.to_string();
    config.smtp.timeout_secs = 5;
    config.message.sender_address = "relay@example.com".to_string();
    config.message.sender_name = Some("Feedback Bot".to_string());
    config.message.recipient_address = "dev@example.com".to_string();
    config.message.subject = "New feedback".to_string();
    config
}
