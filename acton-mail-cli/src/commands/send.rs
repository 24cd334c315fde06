//! `acton-mail send`

use acton_mail::config::{BackendKind, MailConfig};
use acton_mail_cli_lib::ComposeArgs;
use anyhow::{Context, Result};
use console::{style, Emoji};
use tracing::info;

static SUCCESS: Emoji = Emoji("✓", "√");

/// Compose a message and deliver it through the configured backend
pub struct SendCommand {
    compose: ComposeArgs,
    fail_silently: bool,
}

impl SendCommand {
    /// Create a new send command
    pub const fn new(compose: ComposeArgs, fail_silently: bool) -> Self {
        Self {
            compose,
            fail_silently,
        }
    }

    /// Execute the send command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sender is configured
    /// - The template is missing or fails to render
    /// - Delivery fails and `--fail-silently` was not given
    pub async fn execute(&self, config: &MailConfig) -> Result<()> {
        let envelope = self
            .compose
            .envelope(config.email.default_from.as_deref())?;
        let variables = self.compose.variables()?;

        info!(
            template = %self.compose.template,
            backend = ?config.email.backend,
            fail_silently = self.fail_silently,
            "Sending templated email"
        );

        let email = super::mailer(config, &self.compose)
            .send_templated_mail(
                &self.compose.template,
                envelope,
                variables,
                self.fail_silently,
            )
            .await
            .with_context(|| format!("failed to send '{}'", self.compose.template))?;

        info!(
            subject = %email.subject,
            recipients = email.recipients().len(),
            "Templated email handed to backend"
        );

        println!(
            "{}",
            summary(
                &email.subject,
                &email.recipients(),
                config.email.backend,
                self.fail_silently
            )
        );

        Ok(())
    }
}

/// One-line report of a send
///
/// With `--fail-silently` a delivery failure has already been swallowed by
/// the time this runs, so the line only claims the hand-off.
fn summary(
    subject: &str,
    recipients: &[&str],
    backend: BackendKind,
    fail_silently: bool,
) -> String {
    let recipients = style(recipients.join(", ")).cyan();
    if fail_silently {
        format!(
            "{} Handed '{}' for {} to {:?} backend (delivery failures suppressed)",
            SUCCESS,
            style(subject).bold(),
            recipients,
            backend
        )
    } else {
        format!(
            "{} Sent '{}' to {} via {:?} backend",
            SUCCESS,
            style(subject).bold(),
            recipients,
            backend
        )
    }
}
