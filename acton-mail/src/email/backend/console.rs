//! Console backend for development
//!
//! Prints emails to stdout instead of sending them.

use std::fmt::Write as _;
use std::io::Write as _;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::email::{Email, EmailError, EmailSender};

const WIDTH: usize = 51;
const HTML_PREVIEW_LINES: usize = 5;

/// Console email backend for development
///
/// # Examples
///
/// ```rust
/// use acton_mail::email::{ConsoleBackend, Email, EmailSender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = ConsoleBackend::new();
///
/// let email = Email::new("Hello!", "Hello, World!", "noreply@myapp.com", ["user@example.com"]);
/// backend.send(email).await?; // Prints to console
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleBackend {
    verbose: bool,
    fail_silently: bool,
}

impl ConsoleBackend {
    /// Create a new console backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose console backend that also logs full email content
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            verbose: true,
            fail_silently: false,
        }
    }

    /// Log and swallow write failures instead of returning them
    #[must_use]
    pub const fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    /// Render `email` as a boxed console listing
    #[must_use]
    pub fn format(email: &Email) -> String {
        let rule = "─".repeat(WIDTH + 2);
        let mut out = String::new();

        let _ = writeln!(out, "╭{rule}╮");
        row(&mut out, "Console Email");
        let _ = writeln!(out, "├{rule}┤");
        row(&mut out, &format!("From:     {}", email.from));
        row(&mut out, &format!("To:       {}", email.to.join(", ")));
        if !email.cc.is_empty() {
            row(&mut out, &format!("CC:       {}", email.cc.join(", ")));
        }
        if !email.bcc.is_empty() {
            row(&mut out, &format!("BCC:      {}", email.bcc.join(", ")));
        }
        if !email.reply_to.is_empty() {
            row(&mut out, &format!("Reply-To: {}", email.reply_to.join(", ")));
        }
        for (name, value) in &email.headers {
            row(&mut out, &format!("{name}: {value}"));
        }
        row(&mut out, &format!("Subject:  {}", email.subject));
        let _ = writeln!(out, "├{rule}┤");

        row(&mut out, "Plain Text Content:");
        let _ = writeln!(out, "├{rule}┤");
        for line in email.body.lines() {
            row(&mut out, line);
        }

        if let Some(alternative) = &email.alternative {
            let _ = writeln!(out, "├{rule}┤");
            row(&mut out, &format!("Alternative ({}):", alternative.mime_type));
            let _ = writeln!(out, "├{rule}┤");
            for line in alternative.content.lines().take(HTML_PREVIEW_LINES) {
                row(&mut out, line);
            }
            if alternative.content.lines().count() > HTML_PREVIEW_LINES {
                row(&mut out, "... (truncated)");
            }
        }

        if !email.attachments.is_empty() {
            let _ = writeln!(out, "├{rule}┤");
            for name in email.attachment_names() {
                row(&mut out, &format!("Attachment: {name}"));
            }
        }

        let _ = writeln!(out, "╰{rule}╯");
        out
    }
}

fn row(out: &mut String, text: &str) {
    let _ = writeln!(out, "│ {:<WIDTH$} │", truncate(text));
}

fn truncate(line: &str) -> String {
    if line.chars().count() > WIDTH {
        let head: String = line.chars().take(WIDTH - 3).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

#[async_trait]
impl EmailSender for ConsoleBackend {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        info!(
            from = %email.from,
            to = ?email.to,
            cc = ?email.cc,
            bcc = ?email.bcc,
            subject = %email.subject,
            "Console email sent"
        );

        if self.verbose {
            debug!(
                reply_to = ?email.reply_to,
                headers = ?email.headers,
                multipart = email.is_multipart(),
                attachments = ?email.attachment_names(),
                "Email details"
            );
            debug!(text = %email.body, "Email text content");
            if let Some(html) = email.html() {
                debug!(html = %html, "Email HTML content");
            }
        }

        let listing = Self::format(&email);
        let result = std::io::stdout()
            .lock()
            .write_all(format!("\n{listing}\n").as_bytes());

        match result {
            Err(err) if self.fail_silently => {
                warn!(error = %err, "Console email could not be written");
                Ok(())
            }
            other => other.map_err(EmailError::from),
        }
    }
}
