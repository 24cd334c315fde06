//! Email error types

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Errors that can occur when composing or sending emails
#[derive(Debug, Error)]
pub enum EmailError {
    /// Loading the template failed (including `TemplateError::NotFound`)
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A section failed to render; the context was restored before this surfaced
    #[error("failed to render '{section}' block: {source}")]
    Render {
        /// Name of the block being rendered
        section: String,
        /// Engine error
        #[source]
        source: TemplateError,
    },

    /// Address rejected by the transport
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Attachment could not be read at send time
    #[error("failed to read attachment '{}': {source}", path.display())]
    Attachment {
        /// Path of the attachment
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Transport failed to deliver the message
    #[error("transport error: {0}")]
    Transport(String),

    /// Email configuration error
    #[error("email configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EmailError {
    /// Create a render error for `section`
    #[must_use]
    pub fn render<T: Into<String>>(section: T, source: TemplateError) -> Self {
        Self::Render {
            section: section.into(),
            source,
        }
    }

    /// Create a transport error from a string message
    #[must_use]
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error from a string message
    #[must_use]
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether the template itself could not be found
    #[must_use]
    pub const fn is_template_not_found(&self) -> bool {
        matches!(self, Self::Template(TemplateError::NotFound(_)))
    }
}
