//! acton-mail CLI library
//!
//! Argument types shared by the `render` and `send` subcommands.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use acton_mail::email::{Envelope, MessageOptions};
use acton_mail::template::Variables;
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

/// Template, envelope and variables of one message
#[derive(Debug, Clone, Args)]
pub struct ComposeArgs {
    /// Template name, relative to the template directory
    pub template: String,

    /// Recipient address (repeatable)
    #[arg(long, required = true, value_name = "ADDR")]
    pub to: Vec<String>,

    /// Sender address (defaults to `email.default_from`)
    #[arg(long, value_name = "ADDR")]
    pub from: Option<String>,

    /// CC recipient (repeatable)
    #[arg(long, value_name = "ADDR")]
    pub cc: Vec<String>,

    /// BCC recipient (repeatable)
    #[arg(long, value_name = "ADDR")]
    pub bcc: Vec<String>,

    /// Reply-To address (repeatable)
    #[arg(long = "reply-to", value_name = "ADDR")]
    pub reply_to: Vec<String>,

    /// File to attach (repeatable, attached in order)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Extra header (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON file holding an object of template variables
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Template variable; the value is parsed as JSON when possible (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, Value)>,

    /// Do not derive a plaintext body from the html block
    #[arg(long)]
    pub no_plaintext: bool,
}

impl ComposeArgs {
    /// Template variables: the `--vars` file first, then `--var` overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the variables file cannot be read or does not hold
    /// a JSON object
    pub fn variables(&self) -> Result<Variables> {
        let mut variables = match &self.vars_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let value: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("{} is not valid JSON", path.display()))?;
                match value {
                    Value::Object(map) => map,
                    _ => anyhow::bail!("{} must contain a JSON object", path.display()),
                }
            }
            None => Variables::new(),
        };

        for (name, value) in &self.vars {
            variables.insert(name.clone(), value.clone());
        }

        Ok(variables)
    }

    /// Envelope for the message, falling back to `default_from` for the sender
    ///
    /// # Errors
    ///
    /// Returns an error if neither `--from` nor `default_from` is set
    pub fn envelope(&self, default_from: Option<&str>) -> Result<Envelope> {
        let from = self
            .from
            .as_deref()
            .or(default_from)
            .context("no sender: pass --from or set email.default_from")?;

        let options = MessageOptions {
            headers: self.headers.clone(),
            reply_to: self.reply_to.clone(),
            attachments: Vec::new(),
        };

        Ok(Envelope {
            from: from.to_string(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            files: self.files.clone(),
            options,
        })
    }
}

/// Parse `NAME:VALUE` into a header pair
///
/// # Errors
///
/// Returns an error message if there is no `:` or the name is empty
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{raw}': expected NAME:VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid header '{raw}': empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parse `KEY=VALUE` into a template variable
///
/// The value is parsed as JSON when possible, otherwise taken as a string.
///
/// # Errors
///
/// Returns an error message if there is no `=` or the key is empty
pub fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid variable '{raw}': expected KEY=VALUE"))?;
    if key.is_empty() {
        return Err(format!("invalid variable '{raw}': empty key"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
