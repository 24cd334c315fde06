//! Email delivery backends
//!
//! - [`ConsoleBackend`]: prints messages to stdout (development)
//! - [`MemoryBackend`]: keeps messages in an outbox (tests)
//! - [`SmtpBackend`]: delivers through an SMTP relay with `lettre`
//!
//! [`connection`] picks one from [`EmailSettings`].

mod console;
mod memory;
mod smtp;

use std::sync::Arc;

pub use console::ConsoleBackend;
pub use memory::MemoryBackend;
pub use smtp::{SmtpBackend, SmtpConfig};

use super::{EmailError, EmailSender};
use crate::config::{BackendKind, EmailSettings};

/// Open the backend selected by `settings`
///
/// With `fail_silently`, the backend logs delivery failures and reports
/// success instead of returning them.
///
/// # Errors
///
/// Returns `EmailError::ConfigError` if the SMTP host is empty
pub fn connection(
    settings: &EmailSettings,
    fail_silently: bool,
) -> Result<Arc<dyn EmailSender>, EmailError> {
    tracing::debug!(backend = ?settings.backend, fail_silently, "Opening email connection");

    let sender: Arc<dyn EmailSender> = match settings.backend {
        BackendKind::Console => Arc::new(ConsoleBackend::new().fail_silently(fail_silently)),
        BackendKind::Memory => Arc::new(MemoryBackend::global()),
        BackendKind::Smtp => {
            if settings.smtp.host.trim().is_empty() {
                return Err(EmailError::config("SMTP host must not be empty"));
            }
            Arc::new(SmtpBackend::new(settings.smtp.clone()).fail_silently(fail_silently))
        }
    };

    Ok(sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::Email;

    #[tokio::test]
    async fn test_memory_connection_uses_global_outbox() {
        let settings = EmailSettings {
            backend: BackendKind::Memory,
            ..EmailSettings::default()
        };
        let email = Email::new(
            "Global outbox",
            "Body",
            "noreply@myapp.com",
            ["connection-test@example.com"],
        );

        let sender = connection(&settings, false).unwrap();
        sender.send(email).await.unwrap();

        assert!(MemoryBackend::global().was_sent_to("connection-test@example.com"));
    }

    #[test]
    fn test_smtp_connection_requires_host() {
        let mut settings = EmailSettings {
            backend: BackendKind::Smtp,
            ..EmailSettings::default()
        };
        settings.smtp.host = String::new();

        let result = connection(&settings, true);
        assert!(matches!(result, Err(EmailError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_console_connection_sends() {
        let sender = connection(&EmailSettings::default(), false).unwrap();
        let email = Email::new("Console", "Body", "noreply@myapp.com", ["user@example.com"]);

        assert!(sender.send(email).await.is_ok());
    }
}
