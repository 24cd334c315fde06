//! In-crate template stubs for unit tests
//!
//! The stubs implement the template collaborator traits without an engine:
//! a block renders its body with `{{ name }}` placeholders substituted from
//! the context, and every render is recorded together with the context depth
//! it saw.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::template::{Context, Template, TemplateError, TemplateNode, TemplateProvider};

/// Node of a [`StubTemplate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubNode {
    /// Named block with a body
    Block {
        name: String,
        body: String,
        children: Vec<StubNode>,
    },
    /// Named block whose rendering always fails
    Failing { name: String },
    /// Control structure holding other nodes
    Control { children: Vec<StubNode> },
}

impl StubNode {
    pub fn block(name: &str, body: &str) -> Self {
        Self::Block {
            name: name.to_string(),
            body: body.to_string(),
            children: Vec::new(),
        }
    }

    pub fn block_with(name: &str, body: &str, children: Vec<Self>) -> Self {
        Self::Block {
            name: name.to_string(),
            body: body.to_string(),
            children,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self::Failing {
            name: name.to_string(),
        }
    }

    pub const fn control(children: Vec<Self>) -> Self {
        Self::Control { children }
    }
}

impl TemplateNode for StubNode {
    fn block_name(&self) -> Option<&str> {
        match self {
            Self::Block { name, .. } | Self::Failing { name } => Some(name),
            Self::Control { .. } => None,
        }
    }

    fn child_nodes(&self) -> &[Self] {
        match self {
            Self::Block { children, .. } | Self::Control { children } => children,
            Self::Failing { .. } => &[],
        }
    }
}

/// Template made of [`StubNode`]s
#[derive(Debug, Clone)]
pub struct StubTemplate {
    name: String,
    nodes: Vec<StubNode>,
    renders: Arc<Mutex<Vec<(String, usize)>>>,
}

impl StubTemplate {
    pub fn new(name: &str, nodes: Vec<StubNode>) -> Self {
        Self {
            name: name.to_string(),
            nodes,
            renders: Arc::default(),
        }
    }

    /// Rendered block names with the context depth seen, in call order
    pub fn renders(&self) -> Vec<(String, usize)> {
        self.renders.lock().clone()
    }
}

fn substitute(body: &str, context: &Context) -> String {
    context
        .flatten()
        .iter()
        .fold(body.to_string(), |text, (name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            text.replace(&format!("{{{{ {name} }}}}"), &value)
        })
}

impl Template for StubTemplate {
    type Node = StubNode;

    fn name(&self) -> &str {
        &self.name
    }

    fn nodelist(&self) -> &[StubNode] {
        &self.nodes
    }

    fn render_node(&self, node: &StubNode, context: &Context) -> Result<String, TemplateError> {
        match node {
            StubNode::Block { name, body, .. } => {
                self.renders.lock().push((name.clone(), context.depth()));
                Ok(substitute(body, context))
            }
            StubNode::Failing { name } => {
                self.renders.lock().push((name.clone(), context.depth()));
                Err(TemplateError::render(format!("block '{name}' failed")))
            }
            StubNode::Control { .. } => Err(TemplateError::InvalidNode {
                template: self.name.clone(),
                reason: "control node".to_string(),
            }),
        }
    }
}

/// Provider serving [`StubTemplate`]s by name
#[derive(Debug, Clone, Default)]
pub struct StubTemplates {
    templates: HashMap<String, StubTemplate>,
}

impl StubTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template; clones share its render log
    pub fn with(mut self, template: StubTemplate) -> Self {
        self.templates.insert(template.name.clone(), template);
        self
    }

    pub fn template(&self, name: &str) -> Option<&StubTemplate> {
        self.templates.get(name)
    }
}

impl TemplateProvider for StubTemplates {
    type Template = StubTemplate;

    fn get_template(&self, name: &str) -> Result<StubTemplate, TemplateError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}
