//! Layered rendering context
//!
//! A [`Context`] is a stack of variable layers. Lookups walk the stack from
//! the most recently pushed layer down, so pushed variables shadow earlier
//! ones until they are popped again.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

/// A single layer of template variables
pub type Variables = Map<String, Value>;

/// Mutable, layered mapping from variable name to value
///
/// The base layer is never popped.
///
/// # Examples
///
/// ```rust
/// use acton_mail::template::{Context, Variables};
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context.insert("site", "example.com");
///
/// let mut vars = Variables::new();
/// vars.insert("site".to_string(), json!("override.test"));
///
/// {
///     let scoped = context.scope(vars);
///     assert_eq!(scoped.get("site"), Some(&json!("override.test")));
/// }
///
/// assert_eq!(context.get("site"), Some(&json!("example.com")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    layers: Vec<Variables>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            layers: vec![Variables::new()],
        }
    }
}

impl Context {
    /// Create a context with a single empty base layer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new layer on top of the stack
    pub fn push(&mut self, variables: Variables) {
        self.layers.push(variables);
    }

    /// Pop the most recently pushed layer
    ///
    /// Returns `None` when only the base layer is left.
    pub fn pop(&mut self) -> Option<Variables> {
        if self.layers.len() > 1 {
            self.layers.pop()
        } else {
            None
        }
    }

    /// Push `variables` and return a guard that pops them when dropped
    ///
    /// The guard restores the stack to the depth it had before the push,
    /// whichever way the scope is left.
    pub fn scope(&mut self, variables: Variables) -> ContextGuard<'_> {
        let depth = self.layers.len();
        self.push(variables);
        ContextGuard {
            context: self,
            depth,
        }
    }

    /// Look up a variable, most recent layer first
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layers.iter().rev().find_map(|layer| layer.get(name))
    }

    /// Whether any layer binds `name`
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bind a variable in the top layer, returning the value it replaced there
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.layers
            .last_mut()
            .and_then(|layer| layer.insert(name.into(), value.into()))
    }

    /// Number of layers, base layer included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Merge all layers into one map, later layers winning
    #[must_use]
    pub fn flatten(&self) -> Variables {
        let mut merged = Variables::new();
        for layer in &self.layers {
            for (name, value) in layer {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }
}

impl From<Variables> for Context {
    fn from(variables: Variables) -> Self {
        Self {
            layers: vec![variables],
        }
    }
}

/// Scoped layer returned by [`Context::scope`]
///
/// Dereferences to the underlying [`Context`].
#[derive(Debug)]
pub struct ContextGuard<'a> {
    context: &'a mut Context,
    depth: usize,
}

impl Deref for ContextGuard<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.context
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.context.layers.truncate(self.depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Variables {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_push_shadows_and_pop_restores() {
        let mut context = Context::from(vars(json!({"name": "base"})));
        context.push(vars(json!({"name": "pushed"})));

        assert_eq!(context.get("name"), Some(&json!("pushed")));
        assert_eq!(context.depth(), 2);

        let popped = context.pop().unwrap();
        assert_eq!(popped.get("name"), Some(&json!("pushed")));
        assert_eq!(context.get("name"), Some(&json!("base")));
    }

    #[test]
    fn test_base_layer_is_never_popped() {
        let mut context = Context::new();
        context.insert("kept", true);

        assert!(context.pop().is_none());
        assert_eq!(context.depth(), 1);
        assert!(context.contains_key("kept"));
    }

    #[test]
    fn test_scope_pops_on_drop() {
        let mut context = Context::new();
        let before = context.clone();

        {
            let mut scoped = context.scope(vars(json!({"user": "alice"})));
            scoped.insert("extra", 1);
            assert_eq!(scoped.depth(), 2);
            assert_eq!(scoped.get("user"), Some(&json!("alice")));
        }

        assert_eq!(context, before);
    }

    #[test]
    fn test_scope_pops_on_early_return() {
        fn failing(context: &mut Context) -> Result<(), String> {
            let scoped = context.scope(vars(json!({"step": 1})));
            if scoped.contains_key("step") {
                return Err("boom".to_string());
            }
            Ok(())
        }

        let mut context = Context::from(vars(json!({"site": "example.com"})));
        let before = context.clone();

        assert!(failing(&mut context).is_err());
        assert_eq!(context, before);
    }

    #[test]
    fn test_scope_restores_depth_even_if_layer_popped_inside() {
        let mut context = Context::new();
        context.push(vars(json!({"outer": 1})));
        let before = context.clone();

        {
            let mut scoped = context.scope(vars(json!({"inner": 2})));
            scoped.pop();
        }

        assert_eq!(context, before);
    }

    #[test]
    fn test_flatten_prefers_later_layers() {
        let mut context = Context::from(vars(json!({"a": 1, "b": 1})));
        context.push(vars(json!({"b": 2, "c": 2})));

        let flat = context.flatten();
        assert_eq!(flat.get("a"), Some(&json!(1)));
        assert_eq!(flat.get("b"), Some(&json!(2)));
        assert_eq!(flat.get("c"), Some(&json!(2)));
    }
}
