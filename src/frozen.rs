//! Read-only view over a shared cache handle.
//!
//! ## Architecture
//!
//! ```text
//!   Frozen<C>
//!   ┌───────────────────────────────┐
//!   │ inner: Arc<C> ─────────────────────►  C: CacheView<K, V>
//!   │                               │      (shared with wrappers)
//!   │ reads ──────── delegate ─────────►   get / len / keys / ...
//!   │ writes ─────── Err(Immutable) │
//!   └───────────────────────────────┘
//! ```
//!
//! A `Frozen` owns no cache data and never mutates the handle it wraps. It
//! implements [`CacheView`] (reporting `is_frozen() == true`) but not
//! [`CacheHandle`](crate::traits::CacheHandle), so it can be handed to
//! read-only code yet can never back a memoizing wrapper.
//!
//! The write-class methods exist so callers holding a `Frozen` get a typed
//! refusal rather than a missing method. None of them looks at its
//! arguments.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use memokit::error::CacheError;
//! use memokit::frozen::Frozen;
//! use memokit::store::FifoCache;
//! use memokit::traits::{CacheHandle, CacheView};
//!
//! let cache = Arc::new(FifoCache::new(8));
//! cache.insert("k", "v");
//!
//! let view = Frozen::new(Arc::clone(&cache)).unwrap();
//! assert_eq!(view.lookup(&"k"), Ok("v"));
//! assert_eq!(view.len(), 1);
//! assert_eq!(view.set("k", "other"), Err(CacheError::Immutable));
//!
//! // Writes through the handle stay visible.
//! cache.insert("j", "w");
//! assert!(view.contains(&"j"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::CacheError;
use crate::traits::CacheView;

/// Read-only adapter over `Arc<C>`.
pub struct Frozen<C> {
    inner: Arc<C>,
}

impl<C> Frozen<C> {
    /// Wraps `inner`.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidHandle`] if `inner` is itself a frozen view.
    pub fn new<K, V>(inner: Arc<C>) -> Result<Self, CacheError>
    where
        C: CacheView<K, V>,
    {
        if inner.is_frozen() {
            return Err(CacheError::invalid_handle(
                "a frozen view cannot wrap another frozen view",
            ));
        }
        Ok(Self { inner })
    }

    /// Indexed lookup.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] when `key` is absent.
    pub fn lookup<K, V>(&self, key: &K) -> Result<V, CacheError>
    where
        C: CacheView<K, V>,
    {
        self.inner.get(key).ok_or(CacheError::KeyNotFound)
    }

    // -----------------------------------------------------------------------
    // Rejected writes
    // -----------------------------------------------------------------------

    /// Indexed assignment. Always fails.
    pub fn set<K, V>(&self, _key: K, _value: V) -> Result<(), CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Indexed deletion. Always fails.
    pub fn delete<K, V>(&self, _key: &K) -> Result<(), CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Map-style insert. Always fails.
    pub fn insert<K, V>(&self, _key: K, _value: V) -> Result<Option<V>, CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Removal with default. Always fails, even for a missing key.
    pub fn pop<K, V>(&self, _key: &K, _default: V) -> Result<V, CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Always fails, even when `key` is present.
    pub fn setdefault<K, V>(&self, _key: K, _default: V) -> Result<V, CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Always fails, even when the view is empty.
    pub fn popitem<K, V>(&self) -> Result<(K, V), CacheError>
    where
        C: CacheView<K, V>,
    {
        Err(CacheError::Immutable)
    }

    /// Bulk eviction. Always fails; nothing is evicted, even for `n == 0`.
    pub fn drain(&self, _n: usize) -> Result<usize, CacheError> {
        Err(CacheError::Immutable)
    }

    /// Always fails; `reuse` is ignored.
    pub fn clear(&self, _reuse: bool) -> Result<(), CacheError> {
        Err(CacheError::Immutable)
    }

    /// Always fails.
    pub fn shrink_to_fit(&self) -> Result<(), CacheError> {
        Err(CacheError::Immutable)
    }

    /// Bulk assignment. Always fails; `entries` is never iterated.
    pub fn update<K, V, I>(&self, _entries: I) -> Result<(), CacheError>
    where
        C: CacheView<K, V>,
        I: IntoIterator<Item = (K, V)>,
    {
        Err(CacheError::Immutable)
    }
}

impl<K, V, C> CacheView<K, V> for Frozen<C>
where
    C: CacheView<K, V>,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    fn get_or(&self, key: &K, default: V) -> V {
        self.inner.get_or(key, default)
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn maxsize(&self) -> usize {
        self.inner.maxsize()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    fn approx_memory(&self) -> usize {
        self.inner.approx_memory()
    }

    fn keys(&self) -> Vec<K> {
        self.inner.keys()
    }

    fn values(&self) -> Vec<V> {
        self.inner.values()
    }

    fn items(&self) -> Vec<(K, V)> {
        self.inner.items()
    }

    fn is_frozen(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Comparison and formatting
// ---------------------------------------------------------------------------

impl<C: PartialEq> PartialEq for Frozen<C> {
    fn eq(&self, other: &Self) -> bool {
        *self.inner == *other.inner
    }
}

impl<C: PartialEq> PartialEq<Arc<C>> for Frozen<C> {
    fn eq(&self, other: &Arc<C>) -> bool {
        *self.inner == **other
    }
}

impl<C: PartialOrd> PartialOrd for Frozen<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.as_ref().partial_cmp(other.inner.as_ref())
    }
}

impl<C: PartialOrd> PartialOrd<Arc<C>> for Frozen<C> {
    fn partial_cmp(&self, other: &Arc<C>) -> Option<Ordering> {
        self.inner.as_ref().partial_cmp(other.as_ref())
    }
}

impl<C> Clone for Frozen<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: fmt::Display> fmt::Display for Frozen<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Frozen: {}>", self.inner)
    }
}

impl<C: fmt::Debug> fmt::Debug for Frozen<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frozen").field(&self.inner).finish()
    }
}
