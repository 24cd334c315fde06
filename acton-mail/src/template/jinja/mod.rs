//! minijinja-backed template provider
//!
//! Templates are resolved from explicitly added sources first, then from the
//! configured template directory. Blocks are rendered by the engine itself, so
//! `{% extends %}`, macros and includes behave exactly as in a full render.
//! When content outside a block fails to evaluate, the block's own source is
//! rendered against the context instead, so one broken region of a template
//! never takes the other blocks down with it.
//!
//! # Example
//!
//! ```rust
//! use acton_mail::template::{Context, JinjaTemplates, Template, TemplateProvider};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let templates = JinjaTemplates::new();
//! templates.add_template(
//!     "welcome.txt",
//!     "{% block subject %}Welcome {{ name }}{% endblock %}",
//! )?;
//!
//! let template = templates.get_template("welcome.txt")?;
//! let mut context = Context::new();
//! context.insert("name", "Alice");
//!
//! let subject = template.render_node(&template.nodelist()[0], &context)?;
//! assert_eq!(subject, "Welcome Alice");
//! # Ok(())
//! # }
//! ```

mod scan;

use std::path::Path;
use std::sync::Arc;

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use parking_lot::RwLock;

pub use scan::{parse_nodes, JinjaNode};

use super::{Context, Template, TemplateError, TemplateProvider};
use crate::config::TemplateSettings;

/// Thread-safe minijinja environment used as a [`TemplateProvider`]
#[derive(Debug, Clone)]
pub struct JinjaTemplates {
    env: Arc<RwLock<Environment<'static>>>,
}

impl Default for JinjaTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl JinjaTemplates {
    /// Create a provider holding only templates added with [`Self::add_template`]
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Self::wrap(env)
    }

    /// Create a provider loading templates from `dir`
    #[must_use]
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let templates = Self::new();
        templates
            .env
            .write()
            .set_loader(minijinja::path_loader(dir.as_ref().to_path_buf()));
        templates
    }

    /// Create a provider from template settings
    #[must_use]
    pub fn from_settings(settings: &TemplateSettings) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(settings.trim_blocks);
        env.set_lstrip_blocks(settings.lstrip_blocks);
        if settings.strict_undefined {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        env.set_loader(minijinja::path_loader(settings.template_dir.clone()));

        tracing::debug!(
            template_dir = %settings.template_dir.display(),
            strict_undefined = settings.strict_undefined,
            "Template environment created"
        );

        Self::wrap(env)
    }

    fn wrap(env: Environment<'static>) -> Self {
        Self {
            env: Arc::new(RwLock::new(env)),
        }
    }

    /// Register a template from source
    ///
    /// Registered templates take precedence over files in the template directory.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Engine` if the source does not compile
    pub fn add_template(
        &self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), TemplateError> {
        self.env
            .write()
            .add_template_owned(name.into(), source.into())?;
        Ok(())
    }
}

impl TemplateProvider for JinjaTemplates {
    type Template = JinjaTemplate;

    fn get_template(&self, name: &str) -> Result<JinjaTemplate, TemplateError> {
        let env = self.env.read();
        let nodes = match env.get_template(name) {
            Ok(template) => parse_nodes(template.source()),
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => {
                return Err(TemplateError::NotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        drop(env);

        Ok(JinjaTemplate {
            env: Arc::clone(&self.env),
            name: name.to_string(),
            nodes,
        })
    }
}

/// A compiled minijinja template together with its block tree
#[derive(Debug, Clone)]
pub struct JinjaTemplate {
    env: Arc<RwLock<Environment<'static>>>,
    name: String,
    nodes: Vec<JinjaNode>,
}

impl Template for JinjaTemplate {
    type Node = JinjaNode;

    fn name(&self) -> &str {
        &self.name
    }

    fn nodelist(&self) -> &[JinjaNode] {
        &self.nodes
    }

    fn render_node(&self, node: &JinjaNode, context: &Context) -> Result<String, TemplateError> {
        let JinjaNode::Block { name: block, body, .. } = node else {
            return Err(TemplateError::InvalidNode {
                template: self.name.clone(),
                reason: "only named blocks can be rendered on their own".to_string(),
            });
        };

        let env = self.env.read();
        let template = env.get_template(&self.name)?;
        let variables = context.flatten();

        // Inheritance, imports and top-level `set`s only resolve in a full
        // evaluation. When that fails, render the block's own source instead.
        let rendered = match template.render_captured(&variables) {
            Ok(mut captured) => Ok(captured.with_state_mut(|state| state.render_block(block))?),
            Err(err) => {
                tracing::debug!(
                    template = %self.name,
                    block = %block,
                    error = %err,
                    "Template evaluation failed, rendering block source alone"
                );
                Ok(env.render_named_str(&self.name, body, &variables)?)
            }
        };
        rendered
    }
}
