//! # tourgroup
//!
//! Chainable element collections over a live HTML tree.
//!
//! A [`Document`] wraps a parsed `dom_query` tree. [`Document::at`] turns a
//! selector, a node, a list of nodes or another collection into an
//! [`ElementCollection`]: an ordered, duplicate-free group of element handles
//! that can be walked, filtered, rewritten and wired up with event listeners
//! as a whole.
//!
//! ## Quick Start
//!
//! ```rust
//! use tourgroup::Document;
//!
//! let doc = Document::parse(r#"
//!     <ul id="menu">
//!         <li class="item">Home</li>
//!         <li class="item active">Docs</li>
//!         <li class="item">Blog</li>
//!     </ul>"#);
//!
//! let active = doc.at(".active")?;
//! let rest = active.siblings(None)?;
//! assert_eq!(rest.len(), 2);
//!
//! rest.add_class("muted");
//! assert_eq!(active.parent().id().as_deref(), Some("menu"));
//! # Ok::<(), tourgroup::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Traversal**: children, ancestors, siblings and `*_until` walks, each
//!   with an optional selector filter
//! - **Filtering**: `filter`, `exclude`, `has`
//! - **Manipulation**: adjacent insertion, inner/outer markup, text, removal
//!   and unwrapping
//! - **Attributes**: classes, attributes, form values and inline style
//! - **Events**: capture/bubble dispatch, one-shot and delegated listeners

mod attributes;
mod collection;
mod document;
mod error;
mod event_handling;
mod filtering;
mod manipulation;
mod options;
mod traversal;

/// Thin layer over `dom_query` node handles: selectors, node categories and
/// tree mutation.
pub mod dom;

/// Character encoding detection for raw markup.
pub mod encoding;

/// Event objects, listeners and dispatch.
pub mod events;

/// Inline `style` attribute handling.
pub mod style;

// Public API - re-exports
pub use collection::{unique, ElementCollection, IntoElements, Root};
pub use document::Document;
pub use dom::{NodeCategory, Position, Selector};
pub use error::{Error, Result};
pub use events::{Event, EventInit, EventPhase, Listener, ListenerOptions};
pub use options::Options;

pub use dom_query::{NodeId, NodeRef};
pub use tendril::StrTendril;
