//! Email sender trait abstraction
//!
//! Every transport in [`backend`](super::backend) implements [`EmailSender`].

use async_trait::async_trait;

use super::{Email, EmailError};

/// Trait for delivering composed emails
///
/// Implemented by all email backends (console, memory, SMTP).
///
/// # Examples
///
/// ```rust
/// use acton_mail::email::{Email, EmailSender, MemoryBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sender = MemoryBackend::new();
///
/// let email = Email::new("Hello!", "Hello, World!", "noreply@myapp.com", ["user@example.com"]);
/// sender.send(email).await?;
///
/// assert_eq!(sender.sent_count(), 1);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an email
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the email cannot be delivered
    async fn send(&self, email: Email) -> Result<(), EmailError>;

    /// Send multiple emails in batch
    ///
    /// Default implementation sends emails sequentially and stops at the
    /// first failure.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if any email fails to send
    async fn send_batch(&self, emails: Vec<Email>) -> Result<(), EmailError> {
        for email in emails {
            self.send(email).await?;
        }
        Ok(())
    }
}
