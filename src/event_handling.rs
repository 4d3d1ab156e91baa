//! Listener registration and event triggering across a collection.

use crate::collection::ElementCollection;
use crate::dom::Selector;
use crate::error::Result;
use crate::events::{EventInit, Listener, ListenerOptions};

impl ElementCollection<'_> {
    /// Register `listener` for `event_type` on every member.
    ///
    /// Registering the same listener with the same capture flag twice on one
    /// node has no further effect.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) -> &Self {
        let mut registry = self.document().listeners().borrow_mut();
        for node in self {
            registry.add(node.id, event_type, listener, options);
        }
        tracing::debug!(event_type, members = self.len(), "added listener");
        self
    }

    /// Register `listener` to run at most once per member.
    pub fn add_once_listener(&self, event_type: &str, listener: &Listener, capture: bool) -> &Self {
        self.add_event_listener(event_type, listener, ListenerOptions {
            capture,
            once: true,
        })
    }

    /// Register a listener on every member that only runs when the event's
    /// origin node matches `selector`.
    ///
    /// The returned wrapper is what was actually registered; pass it to
    /// [`remove_event_listener`](Self::remove_event_listener) to undo this.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`](crate::Error::InvalidSelector) for a
    /// malformed selector.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use tourgroup::{Document, Listener, ListenerOptions};
    ///
    /// let doc = Document::parse(r#"<ul><li class="item">a</li><li>b</li></ul>"#);
    /// let hits = Rc::new(Cell::new(0));
    /// let seen = Rc::clone(&hits);
    ///
    /// let list = doc.at("ul")?;
    /// let handler = list.add_delegated_listener(
    ///     "click",
    ///     ".item",
    ///     Listener::new(move |_| seen.set(seen.get() + 1)),
    ///     ListenerOptions::default(),
    /// )?;
    /// doc.at("li")?.click();
    /// assert_eq!(hits.get(), 1);
    ///
    /// list.remove_event_listener("click", &handler, false);
    /// doc.at("li")?.click();
    /// assert_eq!(hits.get(), 1);
    /// # Ok::<(), tourgroup::Error>(())
    /// ```
    pub fn add_delegated_listener(
        &self,
        event_type: &str,
        selector: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> Result<Listener> {
        let wrapper = Listener::delegated(Selector::parse(selector)?, listener);
        self.add_event_listener(event_type, &wrapper, options);
        Ok(wrapper)
    }

    /// Remove a registration from every member. `listener` must be the value
    /// that was registered.
    pub fn remove_event_listener(&self, event_type: &str, listener: &Listener, capture: bool) -> &Self {
        let mut registry = self.document().listeners().borrow_mut();
        let removed = self
            .iter()
            .filter(|node| registry.remove(node.id, event_type, listener, capture))
            .count();
        tracing::debug!(event_type, removed, "removed listener");
        self
    }

    /// Dispatch `event_type` on every member with an optional payload.
    /// Bubbling follows [`Options::bubbles_by_default`](crate::Options::bubbles_by_default).
    pub fn trigger(&self, event_type: &str, detail: Option<serde_json::Value>) -> &Self {
        self.trigger_with(event_type, EventInit {
            bubbles: self.document().options().bubbles_by_default,
            detail,
        })
    }

    /// Dispatch `event_type` on every member with explicit init parameters.
    pub fn trigger_with(&self, event_type: &str, init: EventInit) -> &Self {
        let doc = self.document();
        for node in self {
            doc.dispatch(*node, event_type, init.clone());
        }
        self
    }

    /// Dispatch a bubbling `click` on every member.
    pub fn click(&self) -> &Self {
        self.trigger_with("click", EventInit::bubbling())
    }
}
