//! Markup insertion, content replacement and removal.
//!
//! Getters read the first member only; setters write every member and return
//! the collection for chaining. `set_outer_html` and `unwrap` replace nodes the
//! collection may still hold, so they return nothing.
//!
//! Nodes that leave the tree through these methods lose their event listener
//! registrations.

use tendril::StrTendril;

use crate::collection::{unique, ElementCollection};
use crate::dom::{self, Position};

impl ElementCollection<'_> {
    /// Parse `html` and insert it at `position` relative to every member.
    ///
    /// ```rust
    /// use tourgroup::{Document, Position};
    ///
    /// let doc = Document::parse(r#"<ul><li id="a">a</li></ul>"#);
    /// doc.at("#a")?.insert_adjacent_html(Position::AfterEnd, r#"<li id="b">b</li>"#);
    /// assert_eq!(doc.at("li")?.len(), 2);
    /// # Ok::<(), tourgroup::Error>(())
    /// ```
    pub fn insert_adjacent_html(&self, position: Position, html: &str) -> &Self {
        for node in self {
            dom::insert_adjacent_html(node, position, html);
        }
        self
    }

    /// Insert `html` inside every member, after its last child.
    pub fn append_html(&self, html: &str) -> &Self {
        self.insert_adjacent_html(Position::BeforeEnd, html)
    }

    /// Insert `html` inside every member, before its first child.
    pub fn prepend_html(&self, html: &str) -> &Self {
        self.insert_adjacent_html(Position::AfterBegin, html)
    }

    /// Insert `html` after every member.
    pub fn after_html(&self, html: &str) -> &Self {
        self.insert_adjacent_html(Position::AfterEnd, html)
    }

    /// Insert `html` before every member.
    pub fn before_html(&self, html: &str) -> &Self {
        self.insert_adjacent_html(Position::BeforeBegin, html)
    }

    /// Outer markup of the first member.
    #[must_use]
    pub fn outer_html(&self) -> Option<StrTendril> {
        self.first().map(|n| dom::outer_html(&n))
    }

    /// Replace every member with `html`. The replaced handles are detached
    /// afterwards.
    pub fn set_outer_html(&self, html: &str) {
        for node in self {
            self.document().forget_listeners([*node]);
            dom::replace_with_html(node, html);
        }
    }

    /// Inner markup of the first member.
    #[must_use]
    pub fn inner_html(&self) -> Option<StrTendril> {
        self.first().map(|n| dom::inner_html(&n))
    }

    /// Replace the children of every member with `html`.
    pub fn set_inner_html(&self, html: &str) -> &Self {
        for node in self {
            self.document().forget_listeners(dom::child_nodes(node));
            dom::set_inner_html(node, html);
        }
        self
    }

    /// Text content of the first member.
    #[must_use]
    pub fn text_content(&self) -> Option<StrTendril> {
        self.first().map(|n| dom::text_content(&n))
    }

    /// Replace the children of every member with a text node.
    pub fn set_text_content(&self, text: &str) -> &Self {
        for node in self {
            self.document().forget_listeners(dom::child_nodes(node));
            dom::set_text_content(node, text);
        }
        self
    }

    /// Text of the first member with whitespace runs collapsed and trimmed,
    /// the way it reads when rendered.
    #[must_use]
    pub fn inner_text(&self) -> Option<String> {
        self.text_content()
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Same as [`set_text_content`](Self::set_text_content); without layout
    /// there is no difference between the two.
    pub fn set_inner_text(&self, text: &str) -> &Self {
        self.set_text_content(text)
    }

    /// Remove every child of every member.
    pub fn empty(&self) -> &Self {
        for node in self {
            self.document().forget_listeners(dom::child_nodes(node));
            dom::remove_children(node);
        }
        self
    }

    /// Detach every member from the tree. The handles stay valid and can be
    /// re-inserted through the host tree, without their listeners.
    pub fn remove(&self) -> &Self {
        self.document().forget_listeners(self.iter().copied());
        for node in self {
            dom::remove(node);
        }
        self
    }

    /// Replace each member's parent with the parent's own children.
    ///
    /// Parents are collected up front and each is unwrapped once, so members
    /// sharing a parent do not unwrap the grandparent as well. Root-level
    /// parents cannot be replaced and are skipped.
    pub fn unwrap(&self) {
        let parents = unique(self.iter().filter_map(dom::parent_element));
        tracing::debug!(count = parents.len(), "unwrapping parents");
        let mut registry = self.document().listeners().borrow_mut();
        for parent in &parents {
            if parent.parent().is_some() {
                registry.forget(parent.id);
            }
            dom::replace_with_children(parent);
        }
    }
}
