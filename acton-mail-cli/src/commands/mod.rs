//! CLI command implementations

pub mod config;
pub mod render;
pub mod send;

pub use config::ConfigCommand;
pub use render::RenderCommand;
pub use send::SendCommand;

use acton_mail::config::MailConfig;
use acton_mail::email::{Mailer, PlaintextDeriver};
use acton_mail::template::JinjaTemplates;
use acton_mail_cli_lib::ComposeArgs;

/// Mailer for `render` and `send`, honouring `--no-plaintext`
fn mailer(config: &MailConfig, compose: &ComposeArgs) -> Mailer<JinjaTemplates> {
    let mailer = Mailer::from_config(config);
    if compose.no_plaintext {
        mailer.with_plaintext(PlaintextDeriver::Disabled)
    } else {
        mailer
    }
}
