//! Tree traversal over every member of a collection.
//!
//! Each operation reads the tree through the [`dom`](crate::dom) primitives,
//! flattens what every member contributes, and deduplicates the flattened
//! list once. Members that contribute nothing (no parent, no sibling, no
//! match) simply drop out; no placeholder slots are produced.
//!
//! Until-walks test the stop selector *before* collecting a node, so the
//! matching node is never part of the result. Without a stop selector they run
//! to the end of the sibling list or the top of the tree.
//!
//! Selectors are compiled the first time a node has to be tested. An empty
//! collection, or a walk that finds nothing to test, never reports a
//! malformed selector.

use dom_query::NodeRef;

use crate::collection::ElementCollection;
use crate::dom::{self, LazySelector};
use crate::error::Result;

/// Collect nodes produced by repeatedly applying `step`, stopping before the
/// first node matching `stop`.
fn walk_until<'a, F>(
    start: Option<NodeRef<'a>>,
    stop: &LazySelector<'_>,
    step: F,
) -> Result<Vec<NodeRef<'a>>>
where
    F: Fn(&NodeRef<'a>) -> Option<NodeRef<'a>>,
{
    let mut visited = Vec::new();
    let mut current = start;
    while let Some(node) = current {
        if stop.stops_at(&node)? {
            break;
        }
        current = step(&node);
        visited.push(node);
    }
    Ok(visited)
}

impl<'a> ElementCollection<'a> {
    /// Direct element children of every member, optionally filtered by an
    /// exact match on each child.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a child.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tourgroup::Document;
    ///
    /// let doc = Document::parse(r#"<div id="p"><i id="a"></i><i id="b" class="x"></i></div>"#);
    /// let picked = doc.at("#p")?.children(Some(".x"))?;
    /// assert_eq!(picked.id().as_deref(), Some("b"));
    /// # Ok::<(), tourgroup::Error>(())
    /// ```
    pub fn children(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| selector.keep(dom::element_children(node)))
    }

    /// Nearest ancestor-or-self of every member matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector when the collection is not empty.
    pub fn closest(&self, selector: &str) -> Result<Self> {
        let selector = LazySelector::new(Some(selector));
        self.try_flat_map(|node| {
            Ok(selector
                .compiled()?
                .and_then(|s| dom::closest(node, s)))
        })
    }

    /// Descendants of every member matching `selector`. Overlapping subtrees
    /// contribute each node once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector when the collection is not empty.
    pub fn descendants(&self, selector: &str) -> Result<Self> {
        let selector = LazySelector::new(Some(selector));
        self.try_flat_map(|node| {
            Ok(selector
                .compiled()?
                .map(|s| s.query_all(node))
                .unwrap_or_default())
        })
    }

    /// Immediate next element sibling of every member.
    #[must_use]
    pub fn next_element_sibling(&self) -> Self {
        self.flat_map(dom::next_element_sibling)
    }

    /// Immediate next element sibling of every member, kept only when it
    /// matches `selector`. This is a single step, not a search.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a sibling.
    pub fn next(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| selector.keep(dom::next_element_sibling(node)))
    }

    /// Following siblings of every member up to, not including, the first
    /// one matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a sibling.
    pub fn next_until(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| {
            walk_until(
                dom::next_element_sibling(node),
                &selector,
                dom::next_element_sibling,
            )
        })
    }

    /// Immediate previous element sibling of every member.
    #[must_use]
    pub fn previous_element_sibling(&self) -> Self {
        self.flat_map(dom::previous_element_sibling)
    }

    /// Mirror of [`next`](Self::next).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a sibling.
    pub fn prev(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| selector.keep(dom::previous_element_sibling(node)))
    }

    /// Mirror of [`next_until`](Self::next_until), walking backward. Nodes are
    /// listed nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a sibling.
    pub fn prev_until(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| {
            walk_until(
                dom::previous_element_sibling(node),
                &selector,
                dom::previous_element_sibling,
            )
        })
    }

    /// Parent element of every member.
    #[must_use]
    pub fn parent(&self) -> Self {
        self.flat_map(dom::parent_element)
    }

    /// Ancestors of every member, nearest first, up to but not including the
    /// first one matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against an ancestor.
    pub fn parent_until(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| walk_until(dom::parent_element(node), &selector, dom::parent_element))
    }

    /// The other element children of every member's parent, optionally
    /// filtered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector that had to be tested against a sibling.
    pub fn siblings(&self, selector: Option<&str>) -> Result<Self> {
        let selector = LazySelector::new(selector);
        self.try_flat_map(|node| {
            let id = node.id;
            let others = node
                .parent()
                .map(|parent| dom::element_children(&parent))
                .unwrap_or_default()
                .into_iter()
                .filter(|sib| sib.id != id);
            selector.keep(others)
        })
    }
}
