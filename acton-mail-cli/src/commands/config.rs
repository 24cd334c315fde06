//! `acton-mail config`

use acton_mail::config::MailConfig;
use anyhow::Result;

/// Print the effective configuration with the SMTP password masked
pub struct ConfigCommand;

impl ConfigCommand {
    /// Execute the config command
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized
    pub fn execute(config: &MailConfig) -> Result<()> {
        print!("{}", toml::to_string_pretty(&redacted(config))?);
        Ok(())
    }
}

fn redacted(config: &MailConfig) -> MailConfig {
    let mut config = config.clone();
    if config.email.smtp.password.is_some() {
        config.email.smtp.password = Some("********".to_string());
    }
    config
}
