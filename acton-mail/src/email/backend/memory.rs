//! In-memory backend for tests
//!
//! Captures sent emails in an outbox for assertions. The `memory` backend kind
//! in configuration uses the process-wide outbox returned by
//! [`MemoryBackend::global`]. That outbox lives for the whole process and is
//! only emptied by [`MemoryBackend::clear`], so it keeps growing under a
//! long-running `memory` configuration.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::email::{Email, EmailError, EmailSender};

static OUTBOX: Lazy<Arc<Mutex<Vec<Email>>>> = Lazy::new(Arc::default);

/// Email sender that stores messages instead of delivering them
///
/// Clones share one outbox.
///
/// # Examples
///
/// ```rust
/// use acton_mail::email::{Email, EmailSender, MemoryBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outbox = MemoryBackend::new();
///
/// let email = Email::new("Test", "Hello", "noreply@myapp.com", ["user@example.com"]);
/// outbox.send(email).await?;
///
/// assert_eq!(outbox.sent_count(), 1);
/// assert!(outbox.was_sent_to("user@example.com"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    outbox: Arc<Mutex<Vec<Email>>>,
}

impl MemoryBackend {
    /// Create a backend with its own empty outbox
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend sharing the process-wide outbox
    #[must_use]
    pub fn global() -> Self {
        Self {
            outbox: Arc::clone(&OUTBOX),
        }
    }

    /// Number of emails sent
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.outbox.lock().len()
    }

    /// All sent emails in send order
    #[must_use]
    pub fn outbox(&self) -> Vec<Email> {
        self.outbox.lock().clone()
    }

    /// Most recently sent email
    #[must_use]
    pub fn last_sent(&self) -> Option<Email> {
        self.outbox.lock().last().cloned()
    }

    /// Empty the outbox
    pub fn clear(&self) {
        self.outbox.lock().clear();
    }

    /// Whether any email listed `address` as a To, CC or BCC recipient
    #[must_use]
    pub fn was_sent_to(&self, address: &str) -> bool {
        self.outbox
            .lock()
            .iter()
            .any(|email| email.recipients().contains(&address))
    }
}

#[async_trait]
impl EmailSender for MemoryBackend {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        debug!(to = ?email.to, subject = %email.subject, "Email stored in outbox");
        self.outbox.lock().push(email);
        Ok(())
    }
}
