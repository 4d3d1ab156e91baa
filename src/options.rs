//! Configuration options for a [`Document`](crate::Document).
//!
//! The `Options` struct decides the parts of host behavior that are policy
//! rather than tree structure: which nodes count as form controls and how
//! triggered events propagate by default.

/// Configuration options for a document and the collections built on it.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use tourgroup::{Document, Options};
///
/// let options = Options {
///     bubbles_by_default: true,
///     ..Options::default()
/// };
/// let doc = Document::with_options("<input id='q'>", options);
/// assert!(doc.options().bubbles_by_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Tag names treated as input-like (form controls).
    ///
    /// Only members with one of these tags take part in form-value writes;
    /// everything else is skipped silently. Comparison is case-insensitive.
    ///
    /// Default: `["input", "textarea", "select"]`
    pub form_control_tags: Vec<String>,

    /// Whether events raised through `trigger` bubble when no explicit
    /// `EventInit` is given.
    ///
    /// A plain DOM `Event` does not bubble, so neither does this by default.
    ///
    /// Default: `false`
    pub bubbles_by_default: bool,
}

impl Options {
    /// Check whether a tag name is configured as a form control.
    #[must_use]
    pub fn is_form_control_tag(&self, tag: &str) -> bool {
        self.form_control_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            form_control_tags: ["input", "textarea", "select"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            bubbles_by_default: false,
        }
    }
}
