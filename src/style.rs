//! Inline `style` attribute parsing and serialization.
//!
//! There is no layout engine behind the tree, so style reads come from the
//! declarations written in the `style` attribute.

use std::sync::LazyLock;

use regex::Regex;

/// One `property: value` declaration. Values stop at the first `;` outside
/// quotes and parentheses, so `url("a;b")` stays whole.
#[allow(clippy::expect_used)]
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([-\w]+)\s*:\s*((?:"[^"]*"|'[^']*'|\([^)]*\)|[^;"'(])*?)\s*(?:;|$)"#)
        .expect("DECLARATION regex")
});

/// Uppercase letters inside camelCase property names.
#[allow(clippy::expect_used)]
static CAMEL_HUMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("CAMEL_HUMP regex"));

/// Normalize a property name: trimmed, camelCase converted to kebab-case,
/// lowercased. Custom properties (`--x`) keep their case.
#[must_use]
pub fn property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    CAMEL_HUMP
        .replace_all(name, |caps: &regex::Captures| format!("-{}", caps[0].to_ascii_lowercase()))
        .to_ascii_lowercase()
}

/// Parse a `style` attribute into ordered declarations.
#[must_use]
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    DECLARATION
        .captures_iter(style)
        .filter(|c| !c[2].is_empty())
        .map(|c| (property_name(&c[1]), c[2].to_string()))
        .collect()
}

/// Serialize declarations back to attribute text.
#[must_use]
pub fn serialize_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(k, v)| format!("{k}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value declared for `property`, the last declaration winning.
#[must_use]
pub fn get_property(style: &str, property: &str) -> Option<String> {
    let property = property_name(property);
    parse_declarations(style)
        .into_iter()
        .rev()
        .find(|(k, _)| *k == property)
        .map(|(_, v)| v)
}

/// Return `style` with `property` set to `value`. An empty value removes the
/// declaration.
#[must_use]
pub fn set_property(style: &str, property: &str, value: &str) -> String {
    let property = property_name(property);
    let value = value.trim();
    let mut declarations = parse_declarations(style);
    let existing = declarations.iter().position(|(k, _)| *k == property);
    declarations.retain(|(k, _)| *k != property);
    if !value.is_empty() {
        let at = existing.unwrap_or(declarations.len()).min(declarations.len());
        declarations.insert(at, (property, value.to_string()));
    }
    serialize_declarations(&declarations)
}
