//! Filtering a collection down to a subset of its members.

use dom_query::NodeRef;

use crate::collection::ElementCollection;
use crate::dom::LazySelector;
use crate::error::Result;

impl<'a> ElementCollection<'a> {
    /// Members that do not match `selector` themselves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector when the collection is not empty.
    pub fn exclude(&self, selector: &str) -> Result<Self> {
        let selector = LazySelector::new(Some(selector));
        self.try_filter(|node| Ok(!selector.accepts(node)?))
    }

    /// Members with at least one descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector when the collection is not empty.
    pub fn has(&self, selector: &str) -> Result<Self> {
        let selector = LazySelector::new(Some(selector));
        self.try_filter(|node| {
            Ok(selector
                .compiled()?
                .is_some_and(|s| s.matches_descendant(node)))
        })
    }

    /// First member, if any.
    #[must_use]
    pub fn first(&self) -> Option<NodeRef<'a>> {
        self.get(0)
    }

    /// Last member, if any.
    #[must_use]
    pub fn last(&self) -> Option<NodeRef<'a>> {
        self.as_slice().last().copied()
    }
}
