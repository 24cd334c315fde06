//! `acton-mail render`

use acton_mail::config::MailConfig;
use acton_mail::email::ConsoleBackend;
use acton_mail_cli_lib::ComposeArgs;
use anyhow::{Context, Result};
use tracing::debug;

/// Compose a message and print it
pub struct RenderCommand {
    compose: ComposeArgs,
    json: bool,
}

impl RenderCommand {
    /// Create a new render command
    pub const fn new(compose: ComposeArgs, json: bool) -> Self {
        Self { compose, json }
    }

    /// Execute the render command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No sender is configured
    /// - The variables file is unreadable
    /// - The template is missing or fails to render
    pub fn execute(&self, config: &MailConfig) -> Result<()> {
        let envelope = self
            .compose
            .envelope(config.email.default_from.as_deref())?;
        let variables = self.compose.variables()?;

        let email = super::mailer(config, &self.compose)
            .render_mail(&self.compose.template, envelope, variables)
            .with_context(|| format!("failed to compose '{}'", self.compose.template))?;

        debug!(
            template = %self.compose.template,
            multipart = email.is_multipart(),
            attachments = email.attachments.len(),
            "Composed email for printing"
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&email)?);
        } else {
            print!("{}", ConsoleBackend::format(&email));
        }

        Ok(())
    }
}
