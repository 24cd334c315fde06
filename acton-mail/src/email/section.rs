//! Locating and rendering named template sections
//!
//! A section is a named block anywhere in a parsed template tree, including
//! blocks nested inside control structures. Lookup is pre-order: a node is
//! tested before its children, and the first match wins.

use std::fmt;
use std::ptr;

use crate::template::{Context, Template, TemplateError, TemplateNode};

/// Handle to a named block inside a template
///
/// Two handles are equal when they refer to the same node.
pub struct Section<'t, T: Template> {
    template: &'t T,
    node: &'t T::Node,
}

impl<'t, T: Template> Section<'t, T> {
    /// Name of the block
    #[must_use]
    pub fn name(&self) -> &'t str {
        self.node.block_name().unwrap_or_default()
    }

    /// The block node itself
    #[must_use]
    pub const fn node(&self) -> &'t T::Node {
        self.node
    }

    /// Render the block against `context`, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns the engine's `TemplateError` if rendering fails
    pub fn render(&self, context: &Context) -> Result<String, TemplateError> {
        let rendered = self.template.render_node(self.node, context)?;
        Ok(rendered.trim().to_string())
    }
}

impl<T: Template> Clone for Section<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Template> Copy for Section<'_, T> {}

impl<T: Template> PartialEq for Section<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.node, other.node)
    }
}

impl<T: Template> Eq for Section<'_, T> {}

impl<T: Template> fmt::Debug for Section<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("template", &self.template.name())
            .field("name", &self.name())
            .finish()
    }
}

fn find<'t, N: TemplateNode>(nodes: &'t [N], name: &str) -> Option<&'t N> {
    nodes.iter().find_map(|node| {
        if node.block_name() == Some(name) {
            Some(node)
        } else {
            find(node.child_nodes(), name)
        }
    })
}

/// Find the first block called `name` in `template`
#[must_use]
pub fn locate_section<'t, T: Template>(template: &'t T, name: &str) -> Option<Section<'t, T>> {
    find(template.nodelist(), name).map(|node| Section { template, node })
}

/// Render a located section, passing absence through
///
/// # Errors
///
/// Returns the engine's `TemplateError` if rendering fails
pub fn render_section<T: Template>(
    section: Option<Section<'_, T>>,
    context: &Context,
) -> Result<Option<String>, TemplateError> {
    section.map(|section| section.render(context)).transpose()
}

/// Locate the block called `name` and render it
///
/// # Errors
///
/// Returns the engine's `TemplateError` if rendering fails
pub fn render_block<T: Template>(
    template: &T,
    name: &str,
    context: &Context,
) -> Result<Option<String>, TemplateError> {
    render_section(locate_section(template, name), context)
}
