//! Classes, attributes, form values and inline style.
//!
//! Same first-get/all-set shape as the markup accessors. Form-value writes
//! only touch input-like members, as categorized by the document's options;
//! other members are skipped without error.

use dom_query::NodeRef;

use crate::collection::ElementCollection;
use crate::dom::{self, NodeCategory, Selector};
use crate::style;

impl ElementCollection<'_> {
    // === Classes ===

    /// Add `class_name` to every member.
    pub fn add_class(&self, class_name: &str) -> &Self {
        for node in self {
            node.add_class(class_name);
        }
        self
    }

    /// Remove `class_name` from every member.
    pub fn remove_class(&self, class_name: &str) -> &Self {
        for node in self {
            node.remove_class(class_name);
        }
        self
    }

    /// Flip `class_name` on every member independently.
    pub fn toggle_class(&self, class_name: &str) -> &Self {
        for node in self {
            if node.has_class(class_name) {
                node.remove_class(class_name);
            } else {
                node.add_class(class_name);
            }
        }
        self
    }

    /// Whether any member carries `class_name`.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.iter().any(|n| n.has_class(class_name))
    }

    // === Attributes ===

    /// Attribute of the first member.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.first()
            .and_then(|n| dom::attr(&n, name))
            .map(|v| v.to_string())
    }

    /// Set an attribute on every member.
    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        for node in self {
            node.set_attr(name, value);
        }
        self
    }

    /// Remove an attribute from every member.
    pub fn remove_attr(&self, name: &str) -> &Self {
        for node in self {
            node.remove_attr(name);
        }
        self
    }

    /// `id` attribute of the first member.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    // === Form Values ===

    /// Value of the first member when it is a form control.
    ///
    /// `select` reports its selected option (or its first option when none is
    /// selected), `textarea` its text, everything else its `value` attribute.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        let node = self.first()?;
        if dom::categorize(&node, self.document().options()) != NodeCategory::FormControl {
            return None;
        }
        match dom::tag_name(&node).as_deref() {
            Some("textarea") => Some(dom::text_content(&node).to_string()),
            Some("select") => {
                let options = select_options(&node);
                options
                    .iter()
                    .find(|o| o.has_attr("selected"))
                    .or_else(|| options.first())
                    .map(option_value)
            }
            _ => Some(dom::attr(&node, "value").map(|v| v.to_string()).unwrap_or_default()),
        }
    }

    /// Set the value of every form-control member; other members are skipped.
    pub fn set_value(&self, value: &str) -> &Self {
        let options = self.document().options();
        for node in self {
            if dom::categorize(node, options) != NodeCategory::FormControl {
                continue;
            }
            match dom::tag_name(node).as_deref() {
                Some("textarea") => dom::set_text_content(node, value),
                Some("select") => {
                    for option in select_options(node) {
                        if option_value(&option) == value {
                            option.set_attr("selected", "");
                        } else {
                            option.remove_attr("selected");
                        }
                    }
                }
                _ => node.set_attr("value", value),
            }
        }
        self
    }

    // === Style ===

    /// Declared inline value of `property` on the first member.
    #[must_use]
    pub fn css(&self, property: &str) -> Option<String> {
        let node = self.first()?;
        let declared = dom::attr(&node, "style")?;
        style::get_property(&declared, property)
    }

    /// Set an inline style property on every member. An empty value removes
    /// the declaration.
    pub fn set_css(&self, property: &str, value: &str) -> &Self {
        for node in self {
            let current = dom::attr(node, "style").unwrap_or_default();
            let updated = style::set_property(&current, property, value);
            if updated.is_empty() {
                node.remove_attr("style");
            } else {
                node.set_attr("style", &updated);
            }
        }
        self
    }
}

fn select_options<'a>(select: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    Selector::parse("option")
        .map(|s| s.query_all(select))
        .unwrap_or_default()
}

fn option_value(option: &NodeRef) -> String {
    dom::attr(option, "value")
        .map_or_else(|| dom::text_content(option).trim().to_string(), |v| v.to_string())
}
