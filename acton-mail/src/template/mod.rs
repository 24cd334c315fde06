//! Template collaborator interfaces
//!
//! The email pipeline never parses template syntax itself. It only needs
//! three capabilities from a template engine:
//!
//! - load a parsed template by name ([`TemplateProvider`])
//! - walk the parsed node tree looking for named blocks ([`Template`],
//!   [`TemplateNode`])
//! - render a single node against a [`Context`] ([`Template::render_node`])
//!
//! [`jinja`] provides an implementation backed by `minijinja`.

mod context;
mod error;
pub mod jinja;

pub use context::{Context, ContextGuard, Variables};
pub use error::TemplateError;
pub use jinja::{JinjaNode, JinjaTemplate, JinjaTemplates};

/// A node in a parsed template tree
pub trait TemplateNode: Sized {
    /// The block name if this node is a named block
    fn block_name(&self) -> Option<&str>;

    /// Nodes nested directly inside this one, in document order
    fn child_nodes(&self) -> &[Self];
}

/// A parsed template
pub trait Template {
    /// Node type of this template's tree
    type Node: TemplateNode;

    /// Name the template was loaded under
    fn name(&self) -> &str;

    /// Top-level nodes in document order
    fn nodelist(&self) -> &[Self::Node];

    /// Render one node of this template against `context`
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the engine fails to render the node
    fn render_node(&self, node: &Self::Node, context: &Context) -> Result<String, TemplateError>;
}

/// Loads parsed templates by name
pub trait TemplateProvider {
    /// Template type produced by this provider
    type Template: Template;

    /// Load the template registered under `name`
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::NotFound` if no such template exists
    fn get_template(&self, name: &str) -> Result<Self::Template, TemplateError>;
}
