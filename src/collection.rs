//! The element collection type and its construction rules.
//!
//! An [`ElementCollection`] is an ordered list of distinct node handles bound
//! to the [`Document`] they live in. Collections are values: traversal and
//! filtering build new ones, and only the mutation methods touch the tree.
//!
//! Construction accepts anything implementing [`IntoElements`]:
//!
//! | Input | Result |
//! |---|---|
//! | `""`, `None` | empty collection |
//! | selector string | matches in document order (within the context node, if given) |
//! | `NodeRef`, [`Root`] | one-element collection |
//! | `Vec<NodeRef>`, `&[NodeRef]`, `Selection` | entries copied in order |
//! | `ElementCollection` | returned as-is |

use std::collections::HashSet;
use std::fmt;
use std::ops::Index;

use dom_query::{NodeId, NodeRef, Selection};

use crate::document::Document;
use crate::dom::Selector;
use crate::error::Result;

/// Marker for the document root, the top object of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root;

/// Ordered, duplicate-free set of node handles.
#[derive(Clone)]
pub struct ElementCollection<'a> {
    doc: &'a Document,
    nodes: Vec<NodeRef<'a>>,
}

/// Conversion into a collection, see the module docs for the rules.
pub trait IntoElements<'a> {
    /// Build the collection. `context` scopes selector strings to the
    /// descendants of that node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector string.
    fn into_elements(
        self,
        doc: &'a Document,
        context: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>>;
}

impl<'a> IntoElements<'a> for ElementCollection<'a> {
    fn into_elements(self, _: &'a Document, _: Option<NodeRef<'a>>) -> Result<Self> {
        Ok(self)
    }
}

impl<'a> IntoElements<'a> for &str {
    fn into_elements(
        self,
        doc: &'a Document,
        context: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        if self.is_empty() {
            return Ok(ElementCollection::blank(doc));
        }
        let selector = Selector::parse(self)?;
        let scope = context.unwrap_or_else(|| doc.root());
        let found = ElementCollection::from_nodes(doc, selector.query_all(&scope));
        tracing::debug!(selector = self, count = found.len(), "collected elements");
        Ok(found)
    }
}

impl<'a> IntoElements<'a> for &String {
    fn into_elements(
        self,
        doc: &'a Document,
        context: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        self.as_str().into_elements(doc, context)
    }
}

impl<'a> IntoElements<'a> for String {
    fn into_elements(
        self,
        doc: &'a Document,
        context: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        self.as_str().into_elements(doc, context)
    }
}

impl<'a> IntoElements<'a> for NodeRef<'a> {
    fn into_elements(
        self,
        doc: &'a Document,
        _: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        Ok(ElementCollection::from_nodes(doc, vec![self]))
    }
}

impl<'a> IntoElements<'a> for Root {
    fn into_elements(
        self,
        doc: &'a Document,
        _: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        Ok(ElementCollection::from_nodes(doc, vec![doc.root()]))
    }
}

impl<'a> IntoElements<'a> for Vec<NodeRef<'a>> {
    fn into_elements(
        self,
        doc: &'a Document,
        _: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        Ok(ElementCollection::from_nodes(doc, self))
    }
}

impl<'a> IntoElements<'a> for &[NodeRef<'a>] {
    fn into_elements(
        self,
        doc: &'a Document,
        _: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        Ok(ElementCollection::from_nodes(doc, self.to_vec()))
    }
}

impl<'a> IntoElements<'a> for &Selection<'a> {
    fn into_elements(
        self,
        doc: &'a Document,
        _: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        Ok(ElementCollection::from_nodes(doc, self.nodes().to_vec()))
    }
}

impl<'a, T> IntoElements<'a> for Option<T>
where
    T: IntoElements<'a>,
{
    fn into_elements(
        self,
        doc: &'a Document,
        context: Option<NodeRef<'a>>,
    ) -> Result<ElementCollection<'a>> {
        match self {
            Some(input) => input.into_elements(doc, context),
            None => Ok(ElementCollection::blank(doc)),
        }
    }
}

/// Order-preserving identity dedup: the first occurrence of each node wins.
#[must_use]
pub fn unique<'a, I>(nodes: I) -> Vec<NodeRef<'a>>
where
    I: IntoIterator<Item = NodeRef<'a>>,
{
    let mut seen: HashSet<NodeId> = HashSet::new();
    nodes.into_iter().filter(|n| seen.insert(n.id)).collect()
}

impl<'a> ElementCollection<'a> {
    pub(crate) fn blank(doc: &'a Document) -> Self {
        Self {
            doc,
            nodes: Vec::new(),
        }
    }

    /// Wrap nodes, dropping repeats so the distinctness invariant holds.
    pub(crate) fn from_nodes<I>(doc: &'a Document, nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeRef<'a>>,
    {
        Self {
            doc,
            nodes: unique(nodes),
        }
    }

    /// The document this collection belongs to.
    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.nodes.get(index).copied()
    }

    /// Whether `node` is a member (by identity).
    #[must_use]
    pub fn contains(&self, node: &NodeRef<'_>) -> bool {
        self.nodes.iter().any(|n| n.id == node.id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NodeRef<'a>] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeRef<'a>> {
        self.nodes.iter()
    }

    /// Members for which `predicate` holds, in order.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&NodeRef<'a>) -> bool,
    {
        Self {
            doc: self.doc,
            nodes: self.nodes.iter().copied().filter(|n| predicate(n)).collect(),
        }
    }

    /// Apply `f` to every member.
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&NodeRef<'a>) -> T,
    {
        self.nodes.iter().map(f).collect()
    }

    /// Flatten the nodes produced for every member into one collection,
    /// then dedup the whole result once.
    #[must_use]
    pub fn flat_map<I, F>(&self, f: F) -> Self
    where
        I: IntoIterator<Item = NodeRef<'a>>,
        F: FnMut(&NodeRef<'a>) -> I,
    {
        Self::from_nodes(self.doc, self.nodes.iter().flat_map(f))
    }

    /// Fallible [`flat_map`](Self::flat_map): the first error aborts the
    /// whole operation.
    pub(crate) fn try_flat_map<I, F>(&self, mut f: F) -> Result<Self>
    where
        I: IntoIterator<Item = NodeRef<'a>>,
        F: FnMut(&NodeRef<'a>) -> Result<I>,
    {
        let mut produced = Vec::new();
        for node in &self.nodes {
            produced.extend(f(node)?);
        }
        Ok(Self::from_nodes(self.doc, produced))
    }

    /// Fallible [`filter`](Self::filter).
    pub(crate) fn try_filter<F>(&self, mut predicate: F) -> Result<Self>
    where
        F: FnMut(&NodeRef<'a>) -> Result<bool>,
    {
        let mut kept = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if predicate(node)? {
                kept.push(*node);
            }
        }
        Ok(Self {
            doc: self.doc,
            nodes: kept,
        })
    }

    /// Borrow the members as a `dom_query` selection.
    #[must_use]
    pub fn to_selection(&self) -> Selection<'a> {
        Selection::from(self.nodes.clone())
    }
}

impl<'a> Index<usize> for ElementCollection<'a> {
    type Output = NodeRef<'a>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for ElementCollection<'a> {
    type Item = NodeRef<'a>;
    type IntoIter = std::vec::IntoIter<NodeRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'c, 'a> IntoIterator for &'c ElementCollection<'a> {
    type Item = &'c NodeRef<'a>;
    type IntoIter = std::slice::Iter<'c, NodeRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Two collections are equal when they hold the same nodes in the same order.
impl PartialEq for ElementCollection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| a.id == b.id)
    }
}

impl fmt::Debug for ElementCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes.iter().map(|n| n.id))
            .finish()
    }
}
