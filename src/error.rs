//! Error types for the memokit library.
//!
//! ## Key Components
//!
//! - [`CacheError::Immutable`]: Returned by every write-class operation on a
//!   [`Frozen`](crate::frozen::Frozen) view, whatever the arguments were.
//! - [`CacheError::InvalidHandle`]: Returned when a handle cannot be wrapped
//!   (a frozen view over another frozen view).
//! - [`CacheError::KeyNotFound`]: Returned by indexed lookups that miss.
//!
//! Failures raised by a memoized target function are never converted into a
//! [`CacheError`]; the wrappers are generic over the target's own error type
//! and hand it back untouched.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use memokit::error::CacheError;
//! use memokit::frozen::Frozen;
//! use memokit::store::fifo::FifoCache;
//!
//! let cache = Arc::new(FifoCache::<&str, i32>::new(8));
//! let frozen = Frozen::new(cache).unwrap();
//!
//! assert_eq!(frozen.insert("k", 1), Err(CacheError::Immutable));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache views and handle validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A write was attempted through a read-only view.
    #[error("cache is immutable")]
    Immutable,

    /// The supplied handle does not satisfy the capability set required by
    /// the adapter being constructed.
    #[error("invalid cache handle: {0}")]
    InvalidHandle(String),

    /// An indexed lookup found no entry for the key.
    #[error("key not found")]
    KeyNotFound,
}

impl CacheError {
    /// Creates an [`InvalidHandle`](Self::InvalidHandle) error with the given
    /// description.
    #[inline]
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immutable_display_is_fixed() {
        assert_eq!(CacheError::Immutable.to_string(), "cache is immutable");
    }

    #[test]
    fn invalid_handle_display_shows_message() {
        let err = CacheError::invalid_handle("nested frozen view");
        assert_eq!(err.to_string(), "invalid cache handle: nested frozen view");
    }

    #[test]
    fn key_not_found_display() {
        assert_eq!(CacheError::KeyNotFound.to_string(), "key not found");
    }

    #[test]
    fn clone_and_eq() {
        let a = CacheError::invalid_handle("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, CacheError::Immutable);
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
    }
}
