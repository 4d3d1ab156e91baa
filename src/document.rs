//! The live document a collection operates on.
//!
//! `Document` owns the parsed `dom_query` tree together with the host state
//! the tree itself does not carry: the listener registry and the options that
//! decide form-control and event policy. Collections borrow it, so every
//! collection is explicitly tied to one document.

use std::cell::RefCell;
use std::fmt;

use dom_query::NodeRef;
use tendril::StrTendril;

use crate::collection::{ElementCollection, IntoElements};
use crate::encoding;
use crate::error::Result;
use crate::events::{self, Event, EventInit, ListenerRegistry};
use crate::options::Options;

/// A parsed HTML document plus its event registry.
pub struct Document {
    tree: dom_query::Document,
    options: Options,
    listeners: RefCell<ListenerRegistry>,
}

impl Document {
    /// Parse markup with default options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tourgroup::Document;
    ///
    /// let doc = Document::parse("<ul><li>a</li><li>b</li></ul>");
    /// let items = doc.at("li")?;
    /// assert_eq!(items.len(), 2);
    /// # Ok::<(), tourgroup::Error>(())
    /// ```
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self::with_options(html, Options::default())
    }

    /// Parse markup with custom options.
    #[must_use]
    pub fn with_options(html: &str, options: Options) -> Self {
        let tree = dom_query::Document::from(html);
        tracing::debug!(len = html.len(), "parsed document");
        Self {
            tree,
            options,
            listeners: RefCell::new(ListenerRegistry::default()),
        }
    }

    /// Parse raw bytes, detecting the charset from `<meta>` declarations.
    ///
    /// ```rust
    /// use tourgroup::Document;
    ///
    /// let doc = Document::from_bytes(b"<meta charset=\"ISO-8859-1\"><p>Caf\xE9</p>");
    /// assert_eq!(doc.at("p")?.text_content().as_deref(), Some("Café"));
    /// # Ok::<(), tourgroup::Error>(())
    /// ```
    #[must_use]
    pub fn from_bytes(markup: &[u8]) -> Self {
        Self::parse(&encoding::decode_markup(markup))
    }

    /// Build a collection from any supported input, searched against the
    /// whole document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector string.
    pub fn at<'a, I>(&'a self, input: I) -> Result<ElementCollection<'a>>
    where
        I: IntoElements<'a>,
    {
        input.into_elements(self, None)
    }

    /// Build a collection, evaluating selector strings against the
    /// descendants of `context` instead of the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector string.
    pub fn at_in<'a, I>(&'a self, input: I, context: NodeRef<'a>) -> Result<ElementCollection<'a>>
    where
        I: IntoElements<'a>,
    {
        input.into_elements(self, Some(context))
    }

    /// An empty collection bound to this document.
    #[must_use]
    pub fn empty(&self) -> ElementCollection<'_> {
        ElementCollection::blank(self)
    }

    /// The document root node (the window-equivalent top of the tree).
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    /// Serialized markup of the whole document.
    #[must_use]
    pub fn html(&self) -> StrTendril {
        self.tree.html()
    }

    /// The underlying `dom_query` document.
    #[must_use]
    pub fn tree(&self) -> &dom_query::Document {
        &self.tree
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Dispatch an event on a single node.
    ///
    /// Returns `false` if a listener called `prevent_default`.
    pub fn dispatch(&self, target: NodeRef<'_>, event_type: &str, init: EventInit) -> bool {
        let event = Event::new(event_type, target, init);
        events::dispatch(&self.listeners, &event)
    }

    /// Number of registrations for `event_type` on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeRef<'_>, event_type: &str) -> usize {
        self.listeners.borrow().count(node.id, event_type)
    }

    pub(crate) fn listeners(&self) -> &RefCell<ListenerRegistry> {
        &self.listeners
    }

    /// Drop the registrations inside subtrees that are about to leave the
    /// tree.
    pub(crate) fn forget_listeners<'a, I>(&self, roots: I)
    where
        I: IntoIterator<Item = NodeRef<'a>>,
    {
        let dropped = self.listeners.borrow_mut().forget_subtrees(roots);
        if dropped > 0 {
            tracing::debug!(dropped, "dropped listeners of detached nodes");
        }
    }
}

impl From<&str> for Document {
    fn from(html: &str) -> Self {
        Self::parse(html)
    }
}

impl From<String> for Document {
    fn from(html: String) -> Self {
        Self::parse(&html)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
