//! Event listeners and dispatch.
//!
//! `dom_query` has no event system, so the document carries its own listener
//! registry. Dispatch follows the DOM model: a capture pass from the root down
//! to the target's parent, the target itself, then (for bubbling events) a
//! pass back up to the root.
//!
//! Listeners are compared by identity. Removing a registration requires the
//! same [`Listener`] value that was added, which is why the delegated variant
//! hands its wrapper back to the caller.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use dom_query::{NodeId, NodeRef};
use serde::{Deserialize, Serialize};

use crate::dom::{self, Selector};

/// Phase of dispatch an event is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// Not being dispatched.
    None,
    /// Travelling from the root towards the target.
    Capturing,
    /// At the target node.
    AtTarget,
    /// Travelling from the target back to the root.
    Bubbling,
}

/// Initialisation parameters for a dispatched event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInit {
    /// Whether the event propagates to ancestors after the target.
    #[serde(default)]
    pub bubbles: bool,

    /// Custom payload delivered with the event.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl EventInit {
    /// Init for a bubbling event without payload.
    #[must_use]
    pub fn bubbling() -> Self {
        Self {
            bubbles: true,
            detail: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// An event as seen by a listener.
pub struct Event<'a> {
    event_type: String,
    target: NodeRef<'a>,
    current_target: Cell<NodeRef<'a>>,
    phase: Cell<EventPhase>,
    bubbles: bool,
    detail: Option<serde_json::Value>,
    time_stamp: DateTime<Utc>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl<'a> Event<'a> {
    pub(crate) fn new(event_type: &str, target: NodeRef<'a>, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            phase: Cell::new(EventPhase::None),
            bubbles: init.bubbles,
            detail: init.detail,
            time_stamp: Utc::now(),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Event type name, e.g. `"click"`.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was dispatched on (its origin).
    #[must_use]
    pub fn target(&self) -> NodeRef<'a> {
        self.target
    }

    /// The node whose listener is currently running.
    #[must_use]
    pub fn current_target(&self) -> NodeRef<'a> {
        self.current_target.get()
    }

    #[must_use]
    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    #[must_use]
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Payload supplied at dispatch, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&serde_json::Value> {
        self.detail.as_ref()
    }

    /// When the event was created.
    #[must_use]
    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }

    /// Stop the event from reaching further nodes. Listeners on the current
    /// node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("target", &self.target.id)
            .field("phase", &self.phase.get())
            .field("bubbles", &self.bubbles)
            .field("detail", &self.detail)
            .finish_non_exhaustive()
    }
}

type Callback = dyn Fn(&Event<'_>);

/// A registered callback. Cloning keeps identity; two listeners are equal only
/// when they share the same callback allocation.
#[derive(Clone)]
pub struct Listener(Rc<Callback>);

impl Listener {
    /// Wrap a closure as a listener.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Event<'_>) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Wrap a listener so it only runs for events whose origin node matches
    /// `selector`.
    #[must_use]
    pub fn delegated(selector: Selector, inner: Listener) -> Self {
        Self::new(move |event| {
            if selector.matches(&event.target()) {
                inner.call(event);
            }
        })
    }

    fn call(&self, event: &Event<'_>) {
        (self.0)(event);
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener").field(&self.addr()).finish()
    }
}

/// Registration flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture pass instead of the bubble pass.
    pub capture: bool,
    /// Remove the registration before its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    #[must_use]
    pub fn capture() -> Self {
        Self {
            capture: true,
            once: false,
        }
    }

    #[must_use]
    pub fn once() -> Self {
        Self {
            capture: false,
            once: true,
        }
    }
}

#[derive(Clone)]
struct Registration {
    event_type: String,
    listener: Listener,
    capture: bool,
    once: bool,
}

impl Registration {
    fn is(&self, event_type: &str, listener: &Listener, capture: bool) -> bool {
        self.capture == capture && self.event_type == event_type && &self.listener == listener
    }
}

/// Per-node listener storage.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    by_node: HashMap<NodeId, Vec<Registration>>,
}

impl ListenerRegistry {
    /// Returns `false` when an identical registration already exists.
    pub(crate) fn add(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: &Listener,
        options: ListenerOptions,
    ) -> bool {
        let regs = self.by_node.entry(node).or_default();
        if regs.iter().any(|r| r.is(event_type, listener, options.capture)) {
            return false;
        }
        regs.push(Registration {
            event_type: event_type.to_string(),
            listener: listener.clone(),
            capture: options.capture,
            once: options.once,
        });
        true
    }

    /// Returns `false` when nothing matched.
    pub(crate) fn remove(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: &Listener,
        capture: bool,
    ) -> bool {
        let Some(regs) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = regs.len();
        regs.retain(|r| !r.is(event_type, listener, capture));
        let removed = regs.len() != before;
        if regs.is_empty() {
            self.by_node.remove(&node);
        }
        removed
    }

    pub(crate) fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.by_node
            .get(&node)
            .map_or(0, |regs| regs.iter().filter(|r| r.event_type == event_type).count())
    }

    /// Drop every registration on `node`. Returns how many were dropped.
    pub(crate) fn forget(&mut self, node: NodeId) -> usize {
        self.by_node.remove(&node).map_or(0, |regs| regs.len())
    }

    /// Drop every registration inside the subtrees rooted at `roots`.
    pub(crate) fn forget_subtrees<'a, I>(&mut self, roots: I) -> usize
    where
        I: IntoIterator<Item = NodeRef<'a>>,
    {
        if self.by_node.is_empty() {
            return 0;
        }
        let mut pending: Vec<NodeRef<'a>> = roots.into_iter().collect();
        let mut dropped = 0;
        while let Some(node) = pending.pop() {
            dropped += self.forget(node.id);
            pending.extend(dom::child_nodes(&node));
        }
        dropped
    }

    /// Registrations due to run on `node` in `phase`, in registration order.
    /// At the target, capture registrations come before the others.
    /// One-shot registrations are removed as they are handed out.
    fn take_due(&mut self, node: NodeId, event_type: &str, phase: EventPhase) -> Vec<Listener> {
        let Some(regs) = self.by_node.get_mut(&node) else {
            return Vec::new();
        };
        let due = |r: &Registration| {
            r.event_type == event_type
                && match phase {
                    EventPhase::Capturing => r.capture,
                    EventPhase::Bubbling => !r.capture,
                    EventPhase::AtTarget => true,
                    EventPhase::None => false,
                }
        };
        let mut ready: Vec<&Registration> = regs.iter().filter(|r| due(r)).collect();
        ready.sort_by_key(|r| !r.capture);
        let listeners = ready.into_iter().map(|r| r.listener.clone()).collect();
        regs.retain(|r| !(r.once && due(r)));
        listeners
    }
}

/// Run `event` through the capture, target and bubble phases.
///
/// `registry` is borrowed only while collecting due listeners, so callbacks
/// may add or remove registrations. Returns `false` if a listener called
/// [`Event::prevent_default`].
pub(crate) fn dispatch(registry: &RefCell<ListenerRegistry>, event: &Event<'_>) -> bool {
    let target = event.target();
    let mut path = Vec::new();
    let mut ancestor = target.parent();
    while let Some(node) = ancestor {
        ancestor = node.parent();
        path.push(node);
    }

    tracing::trace!(
        event_type = event.event_type(),
        depth = path.len(),
        "dispatching event"
    );

    let mut stopped = path
        .iter()
        .rev()
        .any(|node| run_listeners(registry, event, *node, EventPhase::Capturing));
    if !stopped {
        stopped = run_listeners(registry, event, target, EventPhase::AtTarget);
    }
    if !stopped && event.bubbles() {
        for node in &path {
            if run_listeners(registry, event, *node, EventPhase::Bubbling) {
                break;
            }
        }
    }

    event.phase.set(EventPhase::None);
    event.current_target.set(target);
    !event.default_prevented()
}

/// Invoke the listeners due on one node. Returns whether propagation stopped.
fn run_listeners<'a>(
    registry: &RefCell<ListenerRegistry>,
    event: &Event<'a>,
    node: NodeRef<'a>,
    phase: EventPhase,
) -> bool {
    let due = registry
        .borrow_mut()
        .take_due(node.id, event.event_type(), phase);
    event.current_target.set(node);
    event.phase.set(phase);
    for listener in &due {
        listener.call(event);
    }
    event.propagation_stopped()
}
