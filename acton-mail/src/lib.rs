//! acton-mail: compose emails from named template blocks
//!
//! A mail template defines up to three blocks (`subject`, `plain` and
//! `html`). Each block is rendered against the caller's variables, and the
//! results are assembled into a plain-only or a multipart message that any
//! [`EmailSender`](email::EmailSender) can deliver.
//!
//! # Quick Start
//!
//! ```rust
//! use acton_mail::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let templates = JinjaTemplates::new();
//! templates.add_template(
//!     "reset.email",
//!     "{% block subject %}\nReset your password\n{% endblock %}\
//!      {% block plain %}Hi {{ user }}, follow {{ link }}{% endblock %}",
//! )?;
//!
//! let mut variables = Variables::new();
//! variables.insert("user".to_string(), json!("ada"));
//! variables.insert("link".to_string(), json!("https://example.com/reset/abc"));
//!
//! let email = Mailer::new(templates).render_mail(
//!     "reset.email",
//!     Envelope::new("noreply@example.com", ["ada@example.com"]),
//!     variables,
//! )?;
//!
//! assert_eq!(email.subject, "Reset your password");
//! assert_eq!(email.body, "Hi ada, follow https://example.com/reset/abc");
//! assert!(!email.is_multipart());
//! # Ok(())
//! # }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod email;
pub mod observability;
pub mod template;

#[cfg(test)]
mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_mail::prelude::*;
    //! ```

    pub use crate::config::{BackendKind, EmailSettings, MailConfig, TemplateSettings};
    pub use crate::email::{
        Attachment, Email, EmailError, EmailSender, Envelope, Mailer, MessageOptions,
        PlaintextDeriver,
    };
    pub use crate::template::{
        Context, JinjaTemplates, Template, TemplateError, TemplateProvider, Variables,
    };
}
