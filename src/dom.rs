//! Host tree adapter
//!
//! Thin layer over the `dom_query` crate exposing the per-node primitives the
//! collection is built from: navigation, selector matching, markup and text
//! access, and tree mutation. Everything here works on a single `NodeRef`;
//! fan-out over members and deduplication live in the collection modules.

use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;

use dom_query::{Matcher, NodeRef, Selection};
use tendril::StrTendril;

use crate::error::{Error, Result};
use crate::options::Options;

// === Selectors ===

/// A compiled CSS selector.
///
/// Parsing happens once per operation; the compiled form is then tested
/// against every visited node.
pub struct Selector {
    source: String,
    matcher: Matcher,
}

impl Selector {
    /// Compile a selector expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] when the host tree cannot parse it.
    pub fn parse(source: &str) -> Result<Self> {
        let matcher =
            Matcher::new(source).map_err(|_| Error::InvalidSelector(source.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            matcher,
        })
    }

    /// The selector text this was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Exact match test against a single node. Non-elements never match.
    #[must_use]
    pub fn matches(&self, node: &NodeRef) -> bool {
        node.is_element() && Selection::from(*node).is_matcher(&self.matcher)
    }

    /// All descendants of `node` matching this selector, in document order.
    #[must_use]
    pub fn query_all<'a>(&self, node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
        Selection::from(*node)
            .select_matcher(&self.matcher)
            .nodes()
            .to_vec()
    }

    /// Whether any descendant of `node` matches this selector.
    #[must_use]
    pub fn matches_descendant(&self, node: &NodeRef) -> bool {
        Selection::from(*node)
            .select_matcher(&self.matcher)
            .exists()
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

/// An optional selector that is compiled the first time a node has to be
/// tested against it.
///
/// Walks that never reach a node (empty collections, missing siblings) never
/// compile, so a malformed selector is only reported once it is needed.
pub(crate) struct LazySelector<'s> {
    source: Option<&'s str>,
    compiled: OnceCell<Selector>,
}

impl<'s> LazySelector<'s> {
    pub(crate) fn new(source: Option<&'s str>) -> Self {
        Self {
            source,
            compiled: OnceCell::new(),
        }
    }

    /// The compiled selector, or `None` when no selector was given.
    pub(crate) fn compiled(&self) -> Result<Option<&Selector>> {
        let Some(source) = self.source else {
            return Ok(None);
        };
        if let Some(selector) = self.compiled.get() {
            return Ok(Some(selector));
        }
        let selector = Selector::parse(source)?;
        Ok(Some(self.compiled.get_or_init(|| selector)))
    }

    /// Filter test: an absent selector accepts every node.
    pub(crate) fn accepts(&self, node: &NodeRef) -> Result<bool> {
        Ok(self.compiled()?.is_none_or(|s| s.matches(node)))
    }

    /// Stop test for until-walks: an absent selector never stops.
    pub(crate) fn stops_at(&self, node: &NodeRef) -> Result<bool> {
        Ok(self.compiled()?.is_some_and(|s| s.matches(node)))
    }

    /// Nodes from `nodes` the selector accepts, in order.
    pub(crate) fn keep<'a, I>(&self, nodes: I) -> Result<Vec<NodeRef<'a>>>
    where
        I: IntoIterator<Item = NodeRef<'a>>,
    {
        let mut kept = Vec::new();
        for node in nodes {
            if self.accepts(&node)? {
                kept.push(node);
            }
        }
        Ok(kept)
    }
}

// === Node Information ===

/// Category of a node as far as the collection cares.
///
/// Form controls are the input-like nodes whose value can be read and written;
/// which tags qualify is decided by [`Options::form_control_tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// The document root itself.
    Document,
    /// An element that is not a form control.
    Element,
    /// An input-like element.
    FormControl,
    /// A text node.
    Text,
    /// Comments, doctypes, processing instructions.
    Other,
}

/// Classify a node.
#[must_use]
pub fn categorize(node: &NodeRef, options: &Options) -> NodeCategory {
    if node.is_element() {
        match tag_name(node) {
            Some(tag) if options.is_form_control_tag(&tag) => NodeCategory::FormControl,
            _ => NodeCategory::Element,
        }
    } else if node.is_text() {
        NodeCategory::Text
    } else if node.parent().is_none() {
        NodeCategory::Document
    } else {
        NodeCategory::Other
    }
}

/// Tag name (lowercase), `None` for non-elements.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Attribute value.
#[inline]
#[must_use]
pub fn attr(node: &NodeRef, name: &str) -> Option<StrTendril> {
    node.attr(name)
}

// === Tree Navigation ===

/// Parent element. The document node is not an element, so root-level
/// elements have none.
#[inline]
#[must_use]
pub fn parent_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.parent().filter(NodeRef::is_element)
}

/// Next element sibling (skipping text and comment nodes).
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Previous element sibling (skipping text and comment nodes).
#[must_use]
pub fn previous_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}

/// All child nodes, text included, in document order.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        out.push(c);
    }
    out
}

/// Direct element children in document order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    child_nodes(node)
        .into_iter()
        .filter(NodeRef::is_element)
        .collect()
}

/// Nearest ancestor-or-self matching `selector`.
#[must_use]
pub fn closest<'a>(node: &NodeRef<'a>, selector: &Selector) -> Option<NodeRef<'a>> {
    let mut current = Some(*node).filter(NodeRef::is_element);
    while let Some(n) = current {
        if selector.matches(&n) {
            return Some(n);
        }
        current = parent_element(&n);
    }
    None
}

// === Markup and Text ===

/// Where [`insert_adjacent_html`] places new markup relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Before the node itself.
    BeforeBegin,
    /// Inside the node, before its first child.
    AfterBegin,
    /// Inside the node, after its last child.
    BeforeEnd,
    /// After the node itself.
    AfterEnd,
}

impl Position {
    /// The position keyword as written in markup APIs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
        }
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Self::BeforeBegin),
            "afterbegin" => Ok(Self::AfterBegin),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterend" => Ok(Self::AfterEnd),
            _ => Err(Error::InvalidPosition(s.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse `html` and insert it at `position` relative to `node`.
pub fn insert_adjacent_html(node: &NodeRef, position: Position, html: &str) {
    match position {
        Position::BeforeBegin => node.before_html(html),
        Position::AfterBegin => node.prepend_html(html),
        Position::BeforeEnd => node.append_html(html),
        Position::AfterEnd => node.after_html(html),
    }
}

/// Outer markup of a node.
#[inline]
#[must_use]
pub fn outer_html(node: &NodeRef) -> StrTendril {
    node.html()
}

/// Inner markup of a node.
#[inline]
#[must_use]
pub fn inner_html(node: &NodeRef) -> StrTendril {
    node.inner_html()
}

/// Text content of a node and its descendants.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Replace a node's children with a single text node.
#[inline]
pub fn set_text_content(node: &NodeRef, text: &str) {
    node.set_text(text);
}

// === Tree Manipulation ===

/// Replace a node with parsed markup.
#[inline]
pub fn replace_with_html(node: &NodeRef, html: &str) {
    node.replace_with_html(html);
}

/// Replace a node's children with parsed markup.
#[inline]
pub fn set_inner_html(node: &NodeRef, html: &str) {
    node.set_html(html);
}

/// Detach a node from the tree.
#[inline]
pub fn remove(node: &NodeRef) {
    node.remove_from_parent();
}

/// Detach every child of a node.
#[inline]
pub fn remove_children(node: &NodeRef) {
    node.remove_children();
}

/// Replace a node with its own children, keeping their identities.
///
/// Nodes without a parent cannot be replaced and are left untouched.
pub fn replace_with_children(node: &NodeRef) {
    if node.parent().is_none() {
        return;
    }
    for child in child_nodes(node) {
        node.insert_before(&child);
    }
    node.remove_from_parent();
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn first<'a>(doc: &'a Document, sel: &str) -> NodeRef<'a> {
        *doc.select(sel).nodes().first().expect("fixture element")
    }

    #[test]
    fn test_selector_parse_and_match() {
        let doc = Document::from(r#"<div id="a" class="x">a</div><p id="b">b</p>"#);
        let sel = Selector::parse(".x").expect("valid selector");

        assert!(sel.matches(&first(&doc, "#a")));
        assert!(!sel.matches(&first(&doc, "#b")));
        assert_eq!(sel.as_str(), ".x");
    }

    #[test]
    fn test_selector_parse_invalid() {
        let err = Selector::parse("div[").expect_err("unterminated attribute selector");
        assert_eq!(err, Error::InvalidSelector("div[".to_string()));
    }

    #[test]
    fn test_lazy_selector_absent() {
        let doc = Document::from("<p>x</p>");
        let p = first(&doc, "p");
        let absent = LazySelector::new(None);

        assert!(absent.compiled().expect("nothing to compile").is_none());
        assert!(absent.accepts(&p).expect("no selector"));
        assert!(!absent.stops_at(&p).expect("no selector"));
    }

    #[test]
    fn test_lazy_selector_compiles_on_use() {
        let doc = Document::from("<p>x</p><span>y</span>");
        let p = first(&doc, "p");
        let span = LazySelector::new(Some("span"));

        assert!(!span.accepts(&p).expect("valid"));
        assert!(span.stops_at(&first(&doc, "span")).expect("valid"));
        assert_eq!(span.keep([p, first(&doc, "span")]).expect("valid").len(), 1);
    }

    #[test]
    fn test_lazy_selector_reports_malformed_only_when_used() {
        let doc = Document::from("<p>x</p>");
        let broken = LazySelector::new(Some("li["));

        assert!(broken.keep(Vec::new()).expect("nothing tested").is_empty());
        assert_eq!(
            broken.accepts(&first(&doc, "p")),
            Err(Error::InvalidSelector("li[".to_string()))
        );
    }

    #[test]
    fn test_element_siblings_skip_text() {
        let doc = Document::from(r#"<div><p id="first">1</p>  text  <span id="second">2</span></div>"#);
        let p = first(&doc, "#first");
        let span = first(&doc, "#second");

        assert_eq!(next_element_sibling(&p).map(|n| n.id), Some(span.id));
        assert_eq!(previous_element_sibling(&span).map(|n| n.id), Some(p.id));
        assert!(next_element_sibling(&span).is_none());
        assert!(previous_element_sibling(&p).is_none());
    }

    #[test]
    fn test_parent_element_stops_at_document() {
        let doc = Document::from("<html><body><p>x</p></body></html>");
        let html = first(&doc, "html");
        let body = first(&doc, "body");

        assert_eq!(parent_element(&body).map(|n| n.id), Some(html.id));
        assert!(parent_element(&html).is_none());
    }

    #[test]
    fn test_element_children_and_child_nodes() {
        let doc = Document::from("<ul id='l'>a<li>1</li>b<li>2</li></ul>");
        let ul = first(&doc, "#l");

        assert_eq!(element_children(&ul).len(), 2);
        assert_eq!(child_nodes(&ul).len(), 4);
    }

    #[test]
    fn test_closest_includes_self() {
        let doc = Document::from(r#"<div class="box"><p class="box" id="inner">x</p></div>"#);
        let p = first(&doc, "#inner");
        let sel = Selector::parse(".box").expect("valid");

        assert_eq!(closest(&p, &sel).map(|n| n.id), Some(p.id));
        let missing = Selector::parse(".nope").expect("valid");
        assert!(closest(&p, &missing).is_none());
    }

    #[test]
    fn test_categorize() {
        let doc = Document::from("<div><input id='i'><textarea></textarea>text</div>");
        let opts = Options::default();

        assert_eq!(categorize(&first(&doc, "div"), &opts), NodeCategory::Element);
        assert_eq!(categorize(&first(&doc, "#i"), &opts), NodeCategory::FormControl);
        assert_eq!(categorize(&first(&doc, "textarea"), &opts), NodeCategory::FormControl);
        assert_eq!(categorize(&doc.root(), &opts), NodeCategory::Document);
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!("beforebegin".parse::<Position>(), Ok(Position::BeforeBegin));
        assert_eq!("AfterEnd".parse::<Position>(), Ok(Position::AfterEnd));
        assert_eq!(
            "middle".parse::<Position>(),
            Err(Error::InvalidPosition("middle".to_string()))
        );
        assert_eq!(Position::BeforeEnd.to_string(), "beforeend");
    }

    #[test]
    fn test_insert_adjacent_positions() {
        let doc = Document::from(r#"<div id="wrap"><p id="target"><b>x</b></p></div>"#);
        let target = first(&doc, "#target");

        insert_adjacent_html(&target, Position::BeforeBegin, r#"<i id="bb"></i>"#);
        insert_adjacent_html(&target, Position::AfterBegin, r#"<i id="ab"></i>"#);
        insert_adjacent_html(&target, Position::BeforeEnd, r#"<i id="be"></i>"#);
        insert_adjacent_html(&target, Position::AfterEnd, r#"<i id="ae"></i>"#);

        let ids: Vec<String> = element_children(&first(&doc, "#wrap"))
            .iter()
            .filter_map(|n| n.attr("id").map(|s| s.to_string()))
            .collect();
        assert_eq!(ids, vec!["bb", "target", "ae"]);

        let inner: Vec<String> = element_children(&target)
            .iter()
            .filter_map(tag_name)
            .collect();
        assert_eq!(inner, vec!["i", "b", "i"]);
    }

    #[test]
    fn test_replace_with_children_keeps_identity() {
        let doc = Document::from(r#"<div id="outer"><section id="mid"><p id="a">a</p><p id="b">b</p></section></div>"#);
        let mid = first(&doc, "#mid");
        let a = first(&doc, "#a");

        replace_with_children(&mid);

        assert!(doc.select("#mid").is_empty());
        let outer = first(&doc, "#outer");
        let kids = element_children(&outer);
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].id, a.id);
    }

    #[test]
    fn test_text_and_markup() {
        let doc = Document::from(r#"<div id="d">text <span>nested</span></div>"#);
        let d = first(&doc, "#d");

        assert_eq!(text_content(&d).as_ref(), "text nested");
        assert!(inner_html(&d).contains("<span>"));
        assert!(outer_html(&d).starts_with(r#"<div id="d">"#));

        set_text_content(&d, "<b>plain</b>");
        assert_eq!(text_content(&d).as_ref(), "<b>plain</b>");
        assert!(doc.select("#d b").is_empty());
    }
}
