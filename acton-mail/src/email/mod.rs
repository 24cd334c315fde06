//! Templated email composition and delivery
//!
//! This module provides:
//! - Section lookup and rendering over any [`TemplateProvider`](crate::template::TemplateProvider)
//! - Plaintext derivation from HTML bodies
//! - Assembly of plain-only or multipart messages
//! - Multiple delivery backends (SMTP, console, in-memory)
//!
//! # Examples
//!
//! ## Composing an email from a template
//!
//! ```rust,no_run
//! use acton_mail::config::MailConfig;
//! use acton_mail::email::{Envelope, Mailer};
//! use acton_mail::template::Variables;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MailConfig::load()?;
//! let mailer = Mailer::from_config(&config);
//!
//! let email = mailer
//!     .send_templated_mail(
//!         "emails/welcome.email",
//!         Envelope::new("noreply@myapp.com", ["alice@example.com"]),
//!         Variables::new(),
//!         false,
//!     )
//!     .await?;
//!
//! println!("sent '{}'", email.subject);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending a hand-built email
//!
//! ```rust,no_run
//! use acton_mail::email::{Email, EmailSender, SmtpBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SmtpBackend::from_env()?;
//!
//! let mut email = Email::new("Welcome!", "Welcome to our app!", "noreply@myapp.com", ["user@example.com"]);
//! email.attach_alternative("<h1>Welcome to our app!</h1>", "text/html");
//!
//! backend.send(email).await?;
//! # Ok(())
//! # }
//! ```

mod assemble;
mod backend;
mod builder;
mod envelope;
mod error;
mod plaintext;
mod render;
mod section;
mod sender;

pub use assemble::create_message;
pub use backend::{connection, ConsoleBackend, MemoryBackend, SmtpBackend, SmtpConfig};
pub use builder::{Alternative, Attachment, Email};
pub use envelope::{Envelope, MessageOptions};
pub use error::EmailError;
pub use plaintext::{strip_tags, PlaintextDeriver};
pub use render::{collapse_subject, Mailer, HTML, PLAIN, SUBJECT};
pub use section::{locate_section, render_block, render_section, Section};
pub use sender::EmailSender;

#[cfg(test)]
pub use sender::MockEmailSender;
