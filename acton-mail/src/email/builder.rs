//! Composed email message
//!
//! [`Email`] is the value handed to transports. Its body is always the
//! plaintext part (possibly empty); HTML travels as the single optional
//! [`Alternative`].

use std::path::{Path, PathBuf};

use mime::Mime;
use serde::{Deserialize, Serialize};

/// An alternative representation of the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Alternative content
    pub content: String,

    /// MIME type of the content, e.g. `text/html`
    pub mime_type: String,
}

impl Alternative {
    /// Create a `text/html` alternative
    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: mime::TEXT_HTML.to_string(),
        }
    }

    /// Whether this alternative carries HTML
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.mime_type
            .parse::<Mime>()
            .is_ok_and(|m| m.essence_str() == mime::TEXT_HTML.essence_str())
    }
}

/// A file attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    /// File on disk, read when the message is sent
    File {
        /// Path to the file
        path: PathBuf,
    },

    /// Content held in memory
    Inline {
        /// File name presented to the recipient
        filename: String,
        /// Raw content
        content: Vec<u8>,
        /// MIME type, guessed from `filename` when absent
        mime_type: Option<String>,
    },
}

impl Attachment {
    /// Reference a file on disk
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Attach in-memory content
    #[must_use]
    pub fn inline(
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
        mime_type: Option<&str>,
    ) -> Self {
        Self::Inline {
            filename: filename.into(),
            content: content.into(),
            mime_type: mime_type.map(str::to_string),
        }
    }

    /// File name presented to the recipient
    #[must_use]
    pub fn filename(&self) -> String {
        match self {
            Self::File { path } => path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            ),
            Self::Inline { filename, .. } => filename.clone(),
        }
    }

    /// MIME type of the attachment
    ///
    /// Explicit types win; otherwise the type is guessed from the file name,
    /// falling back to `application/octet-stream`.
    #[must_use]
    pub fn content_type(&self) -> Mime {
        match self {
            Self::File { path } => guess(path),
            Self::Inline {
                filename,
                mime_type,
                ..
            } => mime_type
                .as_deref()
                .and_then(|m| m.parse().ok())
                .unwrap_or_else(|| guess(Path::new(filename))),
        }
    }
}

fn guess(path: &Path) -> Mime {
    mime_guess::from_path(path).first_or_octet_stream()
}

/// An email message
///
/// Either plain-only or multipart with an HTML alternative:
///
/// ```rust
/// use acton_mail::email::Email;
///
/// let mut email = Email::new("Welcome!", "Welcome to our app!", "noreply@myapp.com", ["user@example.com"])
///     .cc("manager@example.com");
/// email.attach_alternative("<h1>Welcome to our app!</h1>", "text/html");
///
/// assert!(email.is_multipart());
/// assert_eq!(email.html(), Some("<h1>Welcome to our app!</h1>"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Subject line, never containing line breaks when composed from a template
    pub subject: String,

    /// Plaintext body (empty for HTML-only messages)
    pub body: String,

    /// Email sender (From)
    pub from: String,

    /// Email recipients (To)
    pub to: Vec<String>,

    /// CC recipients
    pub cc: Vec<String>,

    /// BCC recipients
    pub bcc: Vec<String>,

    /// Reply-To addresses
    pub reply_to: Vec<String>,

    /// Custom headers
    pub headers: Vec<(String, String)>,

    /// Alternative body representation
    pub alternative: Option<Alternative>,

    /// Attachments in the order they were added
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Create a plain-only email
    #[must_use]
    pub fn new<I, S>(
        subject: impl Into<String>,
        body: impl Into<String>,
        from: impl Into<String>,
        to: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            body: body.into(),
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a CC recipient
    #[must_use]
    pub fn cc(mut self, address: &str) -> Self {
        self.cc.push(address.to_string());
        self
    }

    /// Add a BCC recipient
    #[must_use]
    pub fn bcc(mut self, address: &str) -> Self {
        self.bcc.push(address.to_string());
        self
    }

    /// Add a Reply-To address
    #[must_use]
    pub fn reply_to(mut self, address: &str) -> Self {
        self.reply_to.push(address.to_string());
        self
    }

    /// Add a custom header
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Set the alternative representation, replacing any previous one
    pub fn attach_alternative(&mut self, content: impl Into<String>, mime_type: impl Into<String>) {
        self.alternative = Some(Alternative {
            content: content.into(),
            mime_type: mime_type.into(),
        });
    }

    /// Reference a file to attach at send time
    pub fn attach_file(&mut self, path: impl Into<PathBuf>) {
        self.attachments.push(Attachment::file(path));
    }

    /// Add an attachment
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Whether the message carries an alternative body
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        self.alternative.is_some()
    }

    /// HTML alternative content, if any
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.alternative
            .as_ref()
            .filter(|alt| alt.is_html())
            .map(|alt| alt.content.as_str())
    }

    /// Every envelope recipient: To, then CC, then BCC
    #[must_use]
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
            .collect()
    }

    /// Attachment file names in order
    #[must_use]
    pub fn attachment_names(&self) -> Vec<String> {
        self.attachments.iter().map(Attachment::filename).collect()
    }
}
