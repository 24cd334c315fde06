//! Block structure of minijinja template sources
//!
//! The engine has already compiled the source by the time it is scanned here,
//! so the scanner only has to recover nesting: which `{% block %}` tags sit
//! inside which control structures, and the source between each block's tags.
//! Everything else in the source is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::template::TemplateNode;

/// Comments, or a statement tag with its keyword and arguments
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{#.*?#\}|\{%[-+]?\s*(\w+)(.*?)[-+]?%\}").expect("tag pattern is valid")
});

/// Statements that open a body closed by a matching `end*` tag
const CONTROL_TAGS: &[&str] = &[
    "if",
    "for",
    "with",
    "macro",
    "call",
    "filter",
    "autoescape",
];

/// A structural node of a minijinja template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JinjaNode {
    /// `{% block name %}...{% endblock %}`
    Block {
        /// Block name
        name: String,
        /// Source between `{% block %}` and `{% endblock %}`, whitespace
        /// control markers applied
        body: String,
        /// Structural nodes inside the block
        children: Vec<JinjaNode>,
    },

    /// Any other statement with a body (`if`, `for`, `with`, ...)
    Control {
        /// Statement keyword
        tag: String,
        /// Structural nodes inside the body, all branches included
        children: Vec<JinjaNode>,
    },
}

impl TemplateNode for JinjaNode {
    fn block_name(&self) -> Option<&str> {
        match self {
            Self::Block { name, .. } => Some(name),
            Self::Control { .. } => None,
        }
    }

    fn child_nodes(&self) -> &[Self] {
        match self {
            Self::Block { children, .. } | Self::Control { children, .. } => children,
        }
    }
}

enum Opener {
    Block {
        name: String,
        body_start: usize,
        trim_start: bool,
    },
    Control(String),
}

struct Frame {
    opener: Opener,
    children: Vec<JinjaNode>,
}

/// Where the closing tag of a body starts, and whether it trims before itself
#[derive(Clone, Copy)]
struct Close {
    at: usize,
    trim_end: bool,
}

impl Frame {
    const fn new(opener: Opener) -> Self {
        Self {
            opener,
            children: Vec::new(),
        }
    }

    fn into_node(self, source: &str, close: Close) -> JinjaNode {
        match self.opener {
            Opener::Block {
                name,
                body_start,
                trim_start,
            } => {
                let mut body = source.get(body_start..close.at).unwrap_or_default();
                if trim_start {
                    body = body.trim_start();
                }
                if close.trim_end {
                    body = body.trim_end();
                }
                JinjaNode::Block {
                    name,
                    body: body.to_string(),
                    children: self.children,
                }
            }
            Opener::Control(tag) => JinjaNode::Control {
                tag,
                children: self.children,
            },
        }
    }
}

fn opens_body(tag: &str, args: &str) -> bool {
    // `{% set x = 1 %}` is a single statement, `{% set x %}...{% endset %}` has a body
    CONTROL_TAGS.contains(&tag) || (tag == "set" && !args.contains('='))
}

fn attach(stack: &mut [Frame], root: &mut Vec<JinjaNode>, node: JinjaNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Recover the block and control-structure tree of a template source
///
/// Unterminated bodies are closed at the end of the source.
#[must_use]
pub fn parse_nodes(source: &str) -> Vec<JinjaNode> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_raw = false;

    for caps in TAG.captures_iter(source) {
        let Some(tag) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let args = caps.get(2).map_or("", |m| m.as_str()).trim();

        if in_raw {
            in_raw = tag != "endraw";
            continue;
        }

        match tag {
            "raw" => in_raw = true,
            "block" => {
                let name = args.split_whitespace().next().unwrap_or_default();
                stack.push(Frame::new(Opener::Block {
                    name: name.to_string(),
                    body_start: whole.end(),
                    trim_start: whole.as_str().ends_with("-%}"),
                }));
            }
            _ if opens_body(tag, args) => {
                stack.push(Frame::new(Opener::Control(tag.to_string())));
            }
            _ if tag.starts_with("end") => {
                let close = Close {
                    at: whole.start(),
                    trim_end: whole.as_str().starts_with("{%-"),
                };
                if let Some(frame) = stack.pop() {
                    attach(&mut stack, &mut root, frame.into_node(source, close));
                }
            }
            _ => {}
        }
    }

    let eof = Close {
        at: source.len(),
        trim_end: false,
    };
    while let Some(frame) = stack.pop() {
        attach(&mut stack, &mut root, frame.into_node(source, eof));
    }

    root
}
