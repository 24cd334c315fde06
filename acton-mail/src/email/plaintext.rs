//! Plaintext derivation from HTML bodies

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*?>").expect("tag pattern is valid"));

/// Remove markup tags from `html`
///
/// Tags are removed repeatedly until the text is stable. Entities and
/// whitespace are left untouched.
///
/// ```rust
/// use acton_mail::email::strip_tags;
///
/// assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
/// assert_eq!(strip_tags("a &amp; b"), "a &amp; b");
/// ```
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut text = html.to_string();
    loop {
        let stripped = TAG.replace_all(&text, "").into_owned();
        if stripped == text {
            return text;
        }
        text = stripped;
    }
}

/// Strategy producing a plaintext body from an HTML body
#[derive(Clone, Default)]
pub enum PlaintextDeriver {
    /// Strip markup tags with [`strip_tags`]
    #[default]
    StripTags,

    /// Caller-supplied conversion
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),

    /// Never derive; html-only messages keep an empty body
    Disabled,
}

impl PlaintextDeriver {
    /// Wrap a conversion function
    #[must_use]
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Derive plaintext from `html`, or `None` when disabled
    #[must_use]
    pub fn derive(&self, html: &str) -> Option<String> {
        match self {
            Self::StripTags => Some(strip_tags(html)),
            Self::Custom(f) => Some(f(html)),
            Self::Disabled => None,
        }
    }

    /// Whether this deriver produces anything
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Debug for PlaintextDeriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StripTags => f.write_str("StripTags"),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}
