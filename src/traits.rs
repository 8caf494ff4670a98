//! # Cache Handle Capability Traits
//!
//! The memoization layer never looks inside a cache backend. It programs
//! against two small traits that any backend can implement, whatever its
//! eviction policy or storage layout.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CacheView<K, V>              │
//!   │                                         │
//!   │  get(&K) → Option<V>                    │
//!   │  get_or(&K, V) → V                      │
//!   │  contains(&K) → bool                    │
//!   │  len / is_empty / is_full               │
//!   │  maxsize / capacity / approx_memory     │
//!   │  keys / values / items                  │
//!   │  is_frozen() → bool                     │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!          ┌───────────┴─────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────────────┐  ┌──────────────────────────────┐
//!   │ CacheHandle<K, V>    │  │ Frozen<C>                    │
//!   │                      │  │                              │
//!   │ insert / remove      │  │ reads delegate to C          │
//!   │ pop_or / setdefault  │  │ writes → CacheError::Immutable│
//!   │ popitem / drain      │  │                              │
//!   │ clear(reuse)         │  │ ⚠ never a CacheHandle        │
//!   │ shrink_to_fit/update │  └──────────────────────────────┘
//!   └──────────┬───────────┘
//!              │
//!              ▼
//!   Memoized / AsyncMemoized (need writes to store results)
//! ```
//!
//! ## Receiver Model
//!
//! Every method takes `&self`. Handles are shared through `Arc<C>` between
//! any number of wrappers and views, so backends use interior mutability
//! (see [`FifoCache`](crate::store::fifo::FifoCache), which sits behind a
//! `parking_lot::RwLock`). Lookups return owned values; wrap large values in
//! `Arc<V>` to make the clone cheap.
//!
//! ## Iteration
//!
//! `keys`, `values` and `items` return snapshots collected under the
//! backend's read lock. Holding an iterator must not block writers.

/// Read capabilities of a cache handle.
///
/// # Example
///
/// ```
/// use memokit::store::fifo::FifoCache;
/// use memokit::traits::{CacheHandle, CacheView};
///
/// fn describe<C: CacheView<u64, String>>(cache: &C) -> String {
///     format!("{}/{}", cache.len(), cache.maxsize())
/// }
///
/// let cache = FifoCache::new(10);
/// cache.insert(1, "one".to_string());
/// assert_eq!(describe(&cache), "1/10");
/// ```
pub trait CacheView<K, V> {
    /// Looks up a key, returning a clone of the stored value.
    fn get(&self, key: &K) -> Option<V>;

    /// Looks up a key, falling back to `default` on a miss.
    fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if the key has an entry.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries the backend will hold.
    fn maxsize(&self) -> usize;

    /// Number of entries the backend can hold without reallocating.
    fn capacity(&self) -> usize;

    /// Returns `true` if inserting a new key would evict.
    fn is_full(&self) -> bool {
        self.len() >= self.maxsize()
    }

    /// Approximate heap footprint in bytes.
    fn approx_memory(&self) -> usize;

    /// Snapshot of the keys.
    fn keys(&self) -> Vec<K>;

    /// Snapshot of the values.
    fn values(&self) -> Vec<V>;

    /// Snapshot of the key-value pairs.
    fn items(&self) -> Vec<(K, V)>;

    /// Returns `true` for read-only adapters.
    ///
    /// Only [`Frozen`](crate::frozen::Frozen) overrides this; it is how a
    /// frozen view refuses to wrap another frozen view.
    fn is_frozen(&self) -> bool {
        false
    }
}

/// Write capabilities of a cache handle.
///
/// Required by the memoizing wrappers, which must store results.
/// Eviction on insert is the backend's business.
///
/// # Example
///
/// ```
/// use memokit::store::fifo::FifoCache;
/// use memokit::traits::{CacheHandle, CacheView};
///
/// fn reset<C: CacheHandle<u64, u64>>(cache: &C, entries: Vec<(u64, u64)>) {
///     cache.clear(true);
///     cache.update(entries);
/// }
///
/// let cache = FifoCache::new(0);
/// cache.insert(9, 9);
/// reset(&cache, vec![(1, 10), (2, 20)]);
/// assert_eq!(cache.keys(), vec![1, 2]);
/// ```
pub trait CacheHandle<K, V>: CacheView<K, V> {
    /// Inserts a value, returning the previous one for that key.
    fn insert(&self, key: K, value: V) -> Option<V>;

    /// Removes a key, returning its value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Removes a key, falling back to `default` if it was absent.
    fn pop_or(&self, key: &K, default: V) -> V {
        self.remove(key).unwrap_or(default)
    }

    /// Returns the stored value, inserting `default` first if the key is
    /// absent.
    ///
    /// The default implementation is a lookup followed by an insert; backends
    /// with a lock should override it to make the pair atomic.
    fn setdefault(&self, key: K, default: V) -> V
    where
        V: Clone,
    {
        match self.get(&key) {
            Some(value) => value,
            None => {
                self.insert(key, default.clone());
                default
            },
        }
    }

    /// Removes and returns the entry the backend would evict next.
    fn popitem(&self) -> Option<(K, V)>;

    /// Removes up to `n` entries via [`popitem`](Self::popitem), returning how
    /// many were removed.
    fn drain(&self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.popitem().is_some() {
            removed += 1;
        }
        removed
    }

    /// Removes every entry. With `reuse` the allocation is kept for refills.
    fn clear(&self, reuse: bool);

    /// Releases spare capacity.
    fn shrink_to_fit(&self);

    /// Inserts every pair from `entries`.
    fn update<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        Self: Sized,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    // Minimal vec-backed handle exercising the provided methods only.
    struct VecHandle {
        entries: RefCell<Vec<(i32, String)>>,
        maxsize: usize,
    }

    impl VecHandle {
        fn new(maxsize: usize) -> Self {
            Self {
                entries: RefCell::new(Vec::new()),
                maxsize,
            }
        }
    }

    impl CacheView<i32, String> for VecHandle {
        fn get(&self, key: &i32) -> Option<String> {
            self.entries
                .borrow()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }

        fn contains(&self, key: &i32) -> bool {
            self.entries.borrow().iter().any(|(k, _)| k == key)
        }

        fn len(&self) -> usize {
            self.entries.borrow().len()
        }

        fn maxsize(&self) -> usize {
            self.maxsize
        }

        fn capacity(&self) -> usize {
            self.entries.borrow().capacity()
        }

        fn approx_memory(&self) -> usize {
            self.capacity() * std::mem::size_of::<(i32, String)>()
        }

        fn keys(&self) -> Vec<i32> {
            self.entries.borrow().iter().map(|(k, _)| *k).collect()
        }

        fn values(&self) -> Vec<String> {
            self.entries.borrow().iter().map(|(_, v)| v.clone()).collect()
        }

        fn items(&self) -> Vec<(i32, String)> {
            self.entries.borrow().clone()
        }
    }

    impl CacheHandle<i32, String> for VecHandle {
        fn insert(&self, key: i32, value: String) -> Option<String> {
            let mut entries = self.entries.borrow_mut();
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                return Some(std::mem::replace(&mut slot.1, value));
            }
            entries.push((key, value));
            None
        }

        fn remove(&self, key: &i32) -> Option<String> {
            let mut entries = self.entries.borrow_mut();
            let idx = entries.iter().position(|(k, _)| k == key)?;
            Some(entries.remove(idx).1)
        }

        fn popitem(&self) -> Option<(i32, String)> {
            let mut entries = self.entries.borrow_mut();
            if entries.is_empty() {
                None
            } else {
                Some(entries.remove(0))
            }
        }

        fn clear(&self, _reuse: bool) {
            self.entries.borrow_mut().clear();
        }

        fn shrink_to_fit(&self) {
            self.entries.borrow_mut().shrink_to_fit();
        }
    }

    #[test]
    fn get_or_falls_back_on_miss() {
        let h = VecHandle::new(4);
        h.insert(1, "one".into());
        assert_eq!(h.get_or(&1, "x".into()), "one");
        assert_eq!(h.get_or(&2, "x".into()), "x");
    }

    #[test]
    fn is_full_compares_len_to_maxsize() {
        let h = VecHandle::new(2);
        assert!(h.is_empty());
        h.insert(1, "a".into());
        assert!(!h.is_full());
        h.insert(2, "b".into());
        assert!(h.is_full());
    }

    #[test]
    fn setdefault_inserts_only_when_absent() {
        let h = VecHandle::new(4);
        assert_eq!(h.setdefault(1, "first".into()), "first");
        assert_eq!(h.setdefault(1, "second".into()), "first");
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn pop_or_removes_or_defaults() {
        let h = VecHandle::new(4);
        h.insert(1, "one".into());
        assert_eq!(h.pop_or(&1, "d".into()), "one");
        assert_eq!(h.pop_or(&1, "d".into()), "d");
    }

    #[test]
    fn drain_stops_when_empty() {
        let h = VecHandle::new(8);
        h.update((0..3).map(|i| (i, i.to_string())));
        assert_eq!(h.drain(5), 3);
        assert!(h.is_empty());
    }

    #[test]
    fn handles_are_not_frozen_by_default() {
        assert!(!VecHandle::new(1).is_frozen());
    }
}
