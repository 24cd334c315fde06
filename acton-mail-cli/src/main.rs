//! acton-mail CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;

use acton_mail::config::MailConfig;
use acton_mail_cli_lib::ComposeArgs;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ConfigCommand, RenderCommand, SendCommand};

#[derive(Parser)]
#[command(name = "acton-mail")]
#[command(version)]
#[command(about = "Compose and send emails from templates", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./acton-mail.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log composition and delivery details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a message and print it
    Render {
        #[command(flatten)]
        compose: ComposeArgs,

        /// Print the message as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compose a message and send it through the configured backend
    Send {
        #[command(flatten)]
        compose: ComposeArgs,

        /// Log delivery failures instead of failing
        #[arg(long)]
        fail_silently: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    acton_mail::observability::init_with(if cli.verbose { "debug" } else { "warn" })?;

    let config = match &cli.config {
        Some(path) => MailConfig::load_from(path)?,
        None => MailConfig::load()?,
    };

    match cli.command {
        Commands::Render { compose, json } => {
            RenderCommand::new(compose, json).execute(&config)?;
        }
        Commands::Send {
            compose,
            fail_silently,
        } => {
            SendCommand::new(compose, fail_silently)
                .execute(&config)
                .await?;
        }
        Commands::Config => {
            ConfigCommand::execute(&config)?;
        }
    }

    Ok(())
}
