//! Error types for tourgroup.
//!
//! Operations on empty collections never fail. The only failures are the ones
//! the host tree raises for malformed input, passed through unchanged.

/// Error type for collection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The CSS selector could not be parsed by the host tree.
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),

    /// An adjacent-insertion position name was not one of
    /// `beforebegin`, `afterbegin`, `beforeend` or `afterend`.
    #[error("invalid insertion position: {0:?}")]
    InvalidPosition(String),
}

/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, Error>;
