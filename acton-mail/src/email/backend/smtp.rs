//! SMTP backend for sending emails
//!
//! Uses the `lettre` crate to deliver emails through an SMTP relay.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MessageBuilder, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::email::{Attachment, Email, EmailError, EmailSender};

/// SMTP backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP server hostname
    pub host: String,

    /// SMTP server port (usually 587 for STARTTLS)
    pub port: u16,

    /// SMTP username; no authentication when absent
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// Use STARTTLS (default: true)
    pub use_tls: bool,

    /// Connection timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            use_tls: true,
            timeout_secs: None,
        }
    }
}

impl SmtpConfig {
    /// Create SMTP configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `SMTP_HOST`: SMTP server hostname (required)
    /// - `SMTP_PORT`: SMTP server port (default: 587)
    /// - `SMTP_USERNAME`: SMTP username (optional)
    /// - `SMTP_PASSWORD`: SMTP password (optional)
    /// - `SMTP_USE_TLS`: Use TLS (default: true)
    /// - `SMTP_TIMEOUT_SECS`: Connection timeout (optional)
    ///
    /// # Errors
    ///
    /// Returns `EmailError::ConfigError` if `SMTP_HOST` is missing or a
    /// numeric variable does not parse
    pub fn from_env() -> Result<Self, EmailError> {
        let host = std::env::var("SMTP_HOST")
            .map_err(|_| EmailError::config("SMTP_HOST environment variable not set"))?;

        let port = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| EmailError::config("SMTP_PORT must be a valid port number"))?;

        let use_tls = std::env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let timeout_secs = std::env::var("SMTP_TIMEOUT_SECS")
            .ok()
            .map(|secs| secs.parse())
            .transpose()
            .map_err(|_| EmailError::config("SMTP_TIMEOUT_SECS must be a number of seconds"))?;

        Ok(Self {
            host,
            port,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            use_tls,
            timeout_secs,
        })
    }
}

/// SMTP email backend
///
/// # Examples
///
/// ```rust,no_run
/// use acton_mail::email::{Email, EmailSender, SmtpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = SmtpBackend::from_env()?;
///
/// let email = Email::new("Hello!", "Hello, World!", "noreply@myapp.com", ["user@example.com"]);
/// backend.send(email).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SmtpBackend {
    config: SmtpConfig,
    fail_silently: bool,
}

impl SmtpBackend {
    /// Create a new SMTP backend with the given configuration
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            fail_silently: false,
        }
    }

    /// Create a new SMTP backend from environment variables
    ///
    /// # Errors
    ///
    /// Returns `EmailError::ConfigError` if required environment variables are missing
    pub fn from_env() -> Result<Self, EmailError> {
        Ok(Self::new(SmtpConfig::from_env()?))
    }

    /// Log and swallow delivery failures instead of returning them
    #[must_use]
    pub const fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    /// Build a lettre message, reading file attachments from disk
    async fn build_message(email: &Email) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(mailbox(&email.from)?)
            .subject(email.subject.clone());

        for address in &email.to {
            builder = builder.to(mailbox(address)?);
        }
        for address in &email.cc {
            builder = builder.cc(mailbox(address)?);
        }
        for address in &email.bcc {
            builder = builder.bcc(mailbox(address)?);
        }
        for address in &email.reply_to {
            builder = builder.reply_to(mailbox(address)?);
        }
        builder = with_headers(builder, &email.headers)?;

        let body = match &email.alternative {
            Some(alternative) => Body::Multi(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(email.body.clone()))
                    .singlepart(
                        SinglePart::builder()
                            .header(content_type(&alternative.mime_type)?)
                            .body(alternative.content.clone()),
                    ),
            ),
            None => Body::Single(SinglePart::plain(email.body.clone())),
        };

        let message = if email.attachments.is_empty() {
            match body {
                Body::Multi(part) => builder.multipart(part),
                Body::Single(part) => builder.singlepart(part),
            }
        } else {
            let mut mixed = match body {
                Body::Multi(part) => MultiPart::mixed().multipart(part),
                Body::Single(part) => MultiPart::mixed().singlepart(part),
            };
            for attachment in &email.attachments {
                mixed = mixed.singlepart(attachment_part(attachment).await?);
            }
            builder.multipart(mixed)
        };

        message.map_err(|e| EmailError::transport(e.to_string()))
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let mut transport = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
                .map_err(|e| EmailError::transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
        };

        transport = transport
            .port(self.config.port)
            .timeout(self.config.timeout_secs.map(Duration::from_secs));

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            transport = transport.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(transport.build())
    }

    async fn deliver(&self, email: &Email) -> Result<(), EmailError> {
        let message = Self::build_message(email).await?;
        let transport = self.create_transport()?;

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::transport(e.to_string()))?;

        info!(to = ?email.to, subject = %email.subject, host = %self.config.host, "Email sent via SMTP");
        Ok(())
    }
}

enum Body {
    Single(SinglePart),
    Multi(MultiPart),
}

fn mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}

fn content_type(mime_type: &str) -> Result<ContentType, EmailError> {
    ContentType::parse(mime_type)
        .map_err(|_| EmailError::transport(format!("invalid content type: {mime_type}")))
}

fn with_headers(
    mut builder: MessageBuilder,
    headers: &[(String, String)],
) -> Result<MessageBuilder, EmailError> {
    for (name, value) in headers {
        let name = HeaderName::new_from_ascii(name.clone())
            .map_err(|_| EmailError::transport(format!("invalid header name: {name}")))?;
        builder = builder.raw_header(HeaderValue::new(name, value.clone()));
    }
    Ok(builder)
}

async fn attachment_part(attachment: &Attachment) -> Result<SinglePart, EmailError> {
    let content = match attachment {
        Attachment::File { path } => {
            tokio::fs::read(path)
                .await
                .map_err(|source| EmailError::Attachment {
                    path: path.clone(),
                    source,
                })?
        }
        Attachment::Inline { content, .. } => content.clone(),
    };

    let content_type = content_type(attachment.content_type().as_ref())?;
    Ok(lettre::message::Attachment::new(attachment.filename()).body(content, content_type))
}

#[async_trait]
impl EmailSender for SmtpBackend {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        match self.deliver(&email).await {
            Err(err) if self.fail_silently => {
                warn!(error = %err, to = ?email.to, "SMTP delivery failed, suppressed");
                Ok(())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn email() -> Email {
        Email::new(
            "Test Email",
            "This is plain text",
            "sender@example.com",
            ["recipient@example.com"],
        )
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    fn unreachable() -> SmtpConfig {
        SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            use_tls: false,
            timeout_secs: Some(2),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn test_smtp_config_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("SMTP_HOST", "smtp.example.com");
            jail.set_env("SMTP_PORT", "2525");
            jail.set_env("SMTP_USERNAME", "user@example.com");
            jail.set_env("SMTP_PASSWORD", "password123");
            jail.set_env("SMTP_USE_TLS", "false");
            jail.set_env("SMTP_TIMEOUT_SECS", "10");

            let config = SmtpConfig::from_env().unwrap();

            assert_eq!(config.host, "smtp.example.com");
            assert_eq!(config.port, 2525);
            assert_eq!(config.username.as_deref(), Some("user@example.com"));
            assert_eq!(config.password.as_deref(), Some("password123"));
            assert!(!config.use_tls);
            assert_eq!(config.timeout_secs, Some(10));
            Ok(())
        });
    }

    #[test]
    fn test_smtp_config_env_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("SMTP_HOST", "smtp.example.com");

            let config = SmtpConfig::from_env().unwrap();

            assert_eq!(config.port, 587);
            assert!(config.use_tls);
            assert!(config.username.is_none());
            assert!(config.timeout_secs.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_smtp_config_requires_host() {
        Jail::expect_with(|jail| {
            jail.clear_env();

            let err = SmtpConfig::from_env().unwrap_err();
            assert!(matches!(err, EmailError::ConfigError(_)));
            Ok(())
        });
    }

    #[tokio::test]
    async fn test_build_plain_message() {
        let message = SmtpBackend::build_message(&email()).await.unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("Subject: Test Email"));
        assert!(raw.contains("This is plain text"));
        assert!(!raw.contains("multipart/"));
    }

    #[tokio::test]
    async fn test_build_alternative_message_with_headers() {
        let mut email = email()
            .cc("cc@example.com")
            .reply_to("support@example.com")
            .header("X-Campaign", "spring");
        email.attach_alternative("<h1>This is HTML</h1>", "text/html");

        let message = SmtpBackend::build_message(&email).await.unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("X-Campaign: spring"));
        assert!(raw.contains("Reply-To: support@example.com"));
    }

    #[tokio::test]
    async fn test_build_message_with_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "file contents").unwrap();

        let mut email = email();
        email.attach_alternative("<p>Hi</p>", "text/html");
        email.attach(Attachment::inline("data.csv", b"a,b".to_vec(), None));
        email.attach_file(&path);

        let message = SmtpBackend::build_message(&email).await.unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("filename=\"data.csv\""));
        assert!(raw.contains("filename=\"notes.txt\""));
    }

    #[tokio::test]
    async fn test_missing_attachment_file_fails_at_send_time() {
        let mut email = email();
        email.attach_file("/nonexistent/acton-mail/report.pdf");

        let err = SmtpBackend::build_message(&email).await.unwrap_err();
        assert!(matches!(err, EmailError::Attachment { .. }));
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let email = Email::new("Test", "Body", "not an address", ["recipient@example.com"]);

        let err = SmtpBackend::build_message(&email).await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(addr) if addr == "not an address"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let backend = SmtpBackend::new(unreachable());

        let err = backend.send(email()).await.unwrap_err();
        assert!(matches!(err, EmailError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fail_silently_suppresses_delivery_errors() {
        let backend = SmtpBackend::new(unreachable()).fail_silently(true);

        assert!(backend.send(email()).await.is_ok());
    }
}
