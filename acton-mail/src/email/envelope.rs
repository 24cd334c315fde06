//! Delivery envelope for templated messages
//!
//! An [`Envelope`] carries everything about a message that does not come from
//! the template: sender, recipients, file attachments and [`MessageOptions`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::builder::Attachment;

/// Additional message fields passed through to the composed [`Email`]
///
/// [`Email`]: super::Email
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageOptions {
    /// Extra headers in insertion order
    pub headers: Vec<(String, String)>,

    /// Reply-To addresses
    pub reply_to: Vec<String>,

    /// In-memory attachments, placed before file attachments
    pub attachments: Vec<Attachment>,
}

impl MessageOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a Reply-To address
    #[must_use]
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    /// Add an in-memory attachment
    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Sender, recipients and attachments of a templated message
///
/// ```rust
/// use acton_mail::email::{Envelope, MessageOptions};
///
/// let envelope = Envelope::new("noreply@myapp.com", ["user@example.com"])
///     .cc("manager@example.com")
///     .file("reports/weekly.pdf")
///     .options(MessageOptions::new().header("X-Campaign", "weekly"));
///
/// assert_eq!(envelope.to, vec!["user@example.com"]);
/// assert_eq!(envelope.files.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Sender address
    pub from: String,

    /// Recipients, in order; duplicates are kept
    pub to: Vec<String>,

    /// CC recipients
    pub cc: Vec<String>,

    /// BCC recipients
    pub bcc: Vec<String>,

    /// Files to attach, in order; read by the transport at send time
    pub files: Vec<PathBuf>,

    /// Additional message fields
    pub options: MessageOptions,
}

impl Envelope {
    /// Create an envelope for `to`, sent from `from`
    #[must_use]
    pub fn new<I, S>(from: impl Into<String>, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a CC recipient
    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a BCC recipient
    #[must_use]
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Attach a file by path
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Replace the additional message fields
    #[must_use]
    pub fn options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_in_order() {
        let envelope = Envelope::new("from@example.com", ["a@example.com", "a@example.com"])
            .cc("c1@example.com")
            .cc("c2@example.com")
            .bcc("b@example.com")
            .file("a.txt")
            .file("b.txt");

        assert_eq!(envelope.from, "from@example.com");
        assert_eq!(envelope.to, vec!["a@example.com", "a@example.com"]);
        assert_eq!(envelope.cc, vec!["c1@example.com", "c2@example.com"]);
        assert_eq!(envelope.bcc, vec!["b@example.com"]);
        assert_eq!(
            envelope.files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );
        assert_eq!(envelope.options, MessageOptions::default());
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"from": "x@example.com", "to": ["y@example.com"]}"#).unwrap();

        assert_eq!(envelope, Envelope::new("x@example.com", ["y@example.com"]));
    }
}
