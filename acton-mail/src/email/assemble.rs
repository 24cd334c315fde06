//! Message assembly from rendered sections

use super::builder::{Attachment, Email};
use super::envelope::Envelope;

/// Build an [`Email`] from rendered sections and an envelope
///
/// A non-empty `html` makes the message multipart with a `text/html`
/// alternative; otherwise the message is plain-only. The body is `plain`, or
/// empty when absent. In-memory attachments from the envelope options come
/// first, then the envelope's files in order. Files are only referenced here.
#[must_use]
pub fn create_message(
    subject: Option<String>,
    plain: Option<String>,
    html: Option<String>,
    envelope: Envelope,
) -> Email {
    let Envelope {
        from,
        to,
        cc,
        bcc,
        files,
        options,
    } = envelope;

    let mut email = Email {
        subject: subject.unwrap_or_default(),
        body: plain.unwrap_or_default(),
        from,
        to,
        cc,
        bcc,
        reply_to: options.reply_to,
        headers: options.headers,
        alternative: None,
        attachments: options.attachments,
    };

    if let Some(html) = html.filter(|html| !html.is_empty()) {
        email.attach_alternative(html, mime::TEXT_HTML.to_string());
    }

    email
        .attachments
        .extend(files.into_iter().map(Attachment::file));

    email
}
