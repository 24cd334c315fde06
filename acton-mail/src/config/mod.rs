//! Configuration management for acton-mail
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_MAIL_` prefix, nested
//!    keys separated by `__`)
//! 2. The TOML file passed to [`MailConfig::load_from`], or `./acton-mail.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # acton-mail.toml
//! [templates]
//! template_dir = "./templates"
//! strict_undefined = true
//!
//! [email]
//! backend = "smtp"
//! default_from = "noreply@myapp.com"
//! derive_plaintext = true
//!
//! [email.smtp]
//! host = "smtp.myapp.com"
//! port = 587
//! username = "mailer"
//! password = "secret"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_mail::config::MailConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = MailConfig::load()?;
//!
//! let dir = &config.templates.template_dir;
//! let backend = config.email.backend;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::email::SmtpConfig;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "acton-mail.toml";

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "ACTON_MAIL_";

/// Template engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory containing email templates
    pub template_dir: PathBuf,

    /// Remove the first newline after a block tag
    pub trim_blocks: bool,

    /// Strip leading whitespace before a block tag
    pub lstrip_blocks: bool,

    /// Fail rendering on undefined variables instead of printing nothing
    pub strict_undefined: bool,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("./templates"),
            trim_blocks: true,
            lstrip_blocks: true,
            strict_undefined: false,
        }
    }
}

/// Which transport delivers composed messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Print messages to stdout (development)
    #[default]
    Console,
    /// Keep messages in a process-wide outbox (tests)
    ///
    /// The outbox is never drained on its own and grows with every message
    /// until `MemoryBackend::clear` is called. Not for long-running processes.
    Memory,
    /// Deliver through an SMTP relay
    Smtp,
}

/// Email delivery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    /// Transport used by `send` operations
    pub backend: BackendKind,

    /// Sender used when a caller does not provide one
    pub default_from: Option<String>,

    /// Generate the plaintext body from the html block when no plain block exists
    pub derive_plaintext: bool,

    /// SMTP transport settings (used when `backend = "smtp"`)
    pub smtp: SmtpConfig,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Console,
            default_from: None,
            derive_plaintext: true,
            smtp: SmtpConfig::default(),
        }
    }
}

/// Complete acton-mail configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MailConfig {
    /// Template engine settings
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Email delivery settings
    #[serde(default)]
    pub email: EmailSettings,
}

impl MailConfig {
    /// Load configuration from `./acton-mail.toml` and the environment
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if a source holds values of the wrong shape
    pub fn load() -> anyhow::Result<Self> {
        Self::extract(Self::figment(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Load configuration from a specific file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or holds invalid values
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        anyhow::ensure!(
            path.exists(),
            "configuration file not found: {}",
            path.display()
        );
        Self::extract(Self::figment(path))
    }

    /// Layered figment: defaults, then `path`, then `ACTON_MAIL_*` variables
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment
            .extract()
            .context("failed to load acton-mail configuration")?;

        tracing::debug!(
            backend = ?config.email.backend,
            template_dir = %config.templates.template_dir.display(),
            "Configuration loaded"
        );

        Ok(config)
    }
}
