//! Template error types

use thiserror::Error;

/// Errors raised by template providers and rendering engines
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with the given name exists
    #[error("template not found: {0}")]
    NotFound(String),

    /// A node handed to the engine cannot be rendered on its own
    #[error("template '{template}' cannot render node: {reason}")]
    InvalidNode {
        /// Name of the template owning the node
        template: String,
        /// Why the node was rejected
        reason: String,
    },

    /// Engine-agnostic render failure
    #[error("template render error: {0}")]
    Render(String),

    /// Error reported by minijinja while compiling or rendering
    #[error("template engine error: {0}")]
    Engine(#[from] minijinja::Error),
}

impl TemplateError {
    /// Create a render error from a string message
    #[must_use]
    pub fn render<T: Into<String>>(msg: T) -> Self {
        Self::Render(msg.into())
    }

    /// Whether this error means the template does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
