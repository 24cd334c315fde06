//! Composing emails from templates
//!
//! A mail template carries up to three named blocks:
//!
//! - `subject`: the subject line; line breaks are collapsed into spaces
//! - `plain`: the plaintext body
//! - `html`: the HTML body, attached as a `text/html` alternative
//!
//! All three are optional. When `plain` is missing but `html` renders, the
//! plaintext body is derived from the HTML with a [`PlaintextDeriver`].
//!
//! # Example
//!
//! ```rust
//! use acton_mail::email::{Envelope, Mailer};
//! use acton_mail::template::{JinjaTemplates, Variables};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let templates = JinjaTemplates::new();
//! templates.add_template(
//!     "welcome.email",
//!     "{% block subject %}Welcome, {{ name }}{% endblock %}\
//!      {% block html %}<p>Hello <b>{{ name }}</b></p>{% endblock %}",
//! )?;
//!
//! let mailer = Mailer::new(templates);
//! let mut variables = Variables::new();
//! variables.insert("name".to_string(), json!("Ada"));
//!
//! let email = mailer.render_mail(
//!     "welcome.email",
//!     Envelope::new("noreply@myapp.com", ["ada@example.com"]),
//!     variables,
//! )?;
//!
//! assert_eq!(email.subject, "Welcome, Ada");
//! assert_eq!(email.body, "Hello Ada");
//! assert_eq!(email.html(), Some("<p>Hello <b>Ada</b></p>"));
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use super::assemble::create_message;
use super::backend::connection;
use super::envelope::Envelope;
use super::plaintext::PlaintextDeriver;
use super::section::render_block;
use super::{Email, EmailError, EmailSender};
use crate::config::{EmailSettings, MailConfig};
use crate::template::{Context, JinjaTemplates, Template, TemplateProvider, Variables};

/// Name of the subject block
pub const SUBJECT: &str = "subject";

/// Name of the plaintext body block
pub const PLAIN: &str = "plain";

/// Name of the HTML body block
pub const HTML: &str = "html";

/// Characters that end a line in a subject
///
/// Unicode line boundaries: `\n`, `\r`, vertical tab, form feed, the file,
/// group and record separators, NEL and the line and paragraph separators.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Join the lines of `subject` with single spaces
///
/// `\r\n` counts as one break and a trailing break does not start a new line.
#[must_use]
pub fn collapse_subject(subject: &str) -> String {
    let subject = subject.replace("\r\n", "\n");
    subject
        .strip_suffix(LINE_BREAKS)
        .unwrap_or(&subject)
        .split(LINE_BREAKS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Composes emails from templates and optionally hands them to a transport
#[derive(Debug, Clone)]
pub struct Mailer<P> {
    templates: P,
    html_to_plaintext: PlaintextDeriver,
    settings: EmailSettings,
}

impl Mailer<JinjaTemplates> {
    /// Create a mailer from loaded configuration
    ///
    /// Templates are read from `templates.template_dir`; plaintext derivation
    /// is disabled when `email.derive_plaintext` is false.
    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        let deriver = if config.email.derive_plaintext {
            PlaintextDeriver::StripTags
        } else {
            PlaintextDeriver::Disabled
        };

        Self::new(JinjaTemplates::from_settings(&config.templates))
            .with_plaintext(deriver)
            .with_settings(config.email.clone())
    }
}

impl<P: TemplateProvider> Mailer<P> {
    /// Create a mailer over `templates` with default settings
    #[must_use]
    pub fn new(templates: P) -> Self {
        Self {
            templates,
            html_to_plaintext: PlaintextDeriver::default(),
            settings: EmailSettings::default(),
        }
    }

    /// Replace the plaintext deriver
    #[must_use]
    pub fn with_plaintext(mut self, deriver: PlaintextDeriver) -> Self {
        self.html_to_plaintext = deriver;
        self
    }

    /// Replace the delivery settings
    #[must_use]
    pub fn with_settings(mut self, settings: EmailSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Template provider used by this mailer
    #[must_use]
    pub const fn templates(&self) -> &P {
        &self.templates
    }

    /// Delivery settings used by [`Self::send_templated_mail`]
    #[must_use]
    pub const fn settings(&self) -> &EmailSettings {
        &self.settings
    }

    /// Compose an email from the template `name` in a fresh context
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if the template cannot be loaded and
    /// `EmailError::Render` if one of its blocks fails to render
    pub fn render_mail(
        &self,
        name: &str,
        envelope: Envelope,
        variables: Variables,
    ) -> Result<Email, EmailError> {
        let mut context = Context::new();
        self.render_mail_with_context(name, envelope, variables, &mut context)
    }

    /// Compose an email from the template `name` on top of `context`
    ///
    /// `variables` are pushed as one layer for the three renders and popped
    /// again before returning, on success and on failure.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if the template cannot be loaded and
    /// `EmailError::Render` if one of its blocks fails to render
    pub fn render_mail_with_context(
        &self,
        name: &str,
        mut envelope: Envelope,
        variables: Variables,
        context: &mut Context,
    ) -> Result<Email, EmailError> {
        let template = self.templates.get_template(name)?;

        let (subject, plain, html) = {
            let scoped = context.scope(variables);
            (
                render(&template, SUBJECT, &scoped)?,
                render(&template, PLAIN, &scoped)?,
                render(&template, HTML, &scoped)?,
            )
        };

        let subject = subject.as_deref().map(collapse_subject);
        let plain = match (plain, html.as_deref()) {
            (None, Some(html)) if !html.is_empty() => self.html_to_plaintext.derive(html),
            (plain, _) => plain,
        };

        if envelope.from.is_empty() {
            if let Some(from) = &self.settings.default_from {
                envelope.from.clone_from(from);
            }
        }

        debug!(
            template = name,
            has_subject = subject.is_some(),
            has_plain = plain.is_some(),
            has_html = html.as_deref().is_some_and(|html| !html.is_empty()),
            "Email composed from template"
        );

        Ok(create_message(subject, plain, html, envelope))
    }

    /// Compose an email and hand it to `sender` as a single batch
    ///
    /// Returns the composed email.
    ///
    /// # Errors
    ///
    /// Returns composition errors, or the sender's error if delivery fails
    pub async fn send_with(
        &self,
        sender: &dyn EmailSender,
        name: &str,
        envelope: Envelope,
        variables: Variables,
    ) -> Result<Email, EmailError> {
        let email = self.render_mail(name, envelope, variables)?;
        sender.send_batch(vec![email.clone()]).await?;
        Ok(email)
    }

    /// Compose an email and send it through the configured backend
    ///
    /// With `fail_silently`, delivery failures are logged by the backend and
    /// not returned. Composition errors are always returned.
    ///
    /// # Errors
    ///
    /// Returns composition errors, backend configuration errors, or delivery
    /// errors when `fail_silently` is false
    pub async fn send_templated_mail(
        &self,
        name: &str,
        envelope: Envelope,
        variables: Variables,
        fail_silently: bool,
    ) -> Result<Email, EmailError> {
        let sender = connection(&self.settings, fail_silently)?;
        self.send_with(sender.as_ref(), name, envelope, variables)
            .await
    }
}

fn render<T: Template>(
    template: &T,
    section: &str,
    context: &Context,
) -> Result<Option<String>, EmailError> {
    render_block(template, section, context).map_err(|source| EmailError::render(section, source))
}
