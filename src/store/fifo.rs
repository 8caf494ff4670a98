//! Insertion-ordered cache handle.
//!
//! `FifoCache` is the backend [`cached_default`](crate::builder::cached_default)
//! builds when the caller brings no cache of their own. It is deliberately
//! plain: entries leave in the order they arrived, and a `maxsize` of `0`
//! means "never evict".
//!
//! ## Architecture
//!
//! ```text
//!   RwLock<FifoInner>
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │  map:   FxHashMap<K, Slot { seq, value }>                     │
//!   │  order: VecDeque<(seq, K)>      front = oldest                │
//!   │                                                               │
//!   │    order: [(0,A)] [(1,B)] [(2,C)] [(3,D)]                     │
//!   │              ▲       ✗                                        │
//!   │           oldest   stale (B removed; seq no longer in map)    │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Removing a key only touches the map. The queue entry goes stale and is
//! skipped when it reaches the front, or dropped by compaction once stale
//! entries outnumber live ones. Updating an existing key keeps its slot and
//! its position.
//!
//! ## Core Operations
//!
//! | Operation   | Description                              | Complexity  |
//! |-------------|------------------------------------------|-------------|
//! | `insert`    | Insert or update; evicts oldest if full  | O(1) amort. |
//! | `get`       | Clone the value out                      | O(1) avg    |
//! | `remove`    | Delete by key                            | O(1) amort. |
//! | `popitem`   | Remove the oldest entry                  | O(1) amort. |
//! | `keys`/...  | Snapshot in insertion order              | O(n)        |
//!
//! ## Example Usage
//!
//! ```
//! use memokit::store::fifo::FifoCache;
//! use memokit::traits::{CacheHandle, CacheView};
//!
//! let cache = FifoCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.insert("c", 3); // evicts "a"
//!
//! assert!(!cache.contains(&"a"));
//! assert_eq!(cache.keys(), vec!["b", "c"]);
//! ```
//!
//! ## Thread Safety
//!
//! All state sits behind one `parking_lot::RwLock`, so `FifoCache` is
//! `Send + Sync` whenever `K` and `V` are, and can be shared through `Arc`.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::mem;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::traits::{CacheHandle, CacheView};

#[derive(Debug)]
struct Slot<V> {
    seq: u64,
    value: V,
}

#[derive(Debug)]
struct FifoInner<K, V> {
    map: FxHashMap<K, Slot<V>>,
    order: VecDeque<(u64, K)>,
    next_seq: u64,
}

impl<K, V> FifoInner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: VecDeque::with_capacity(capacity),
            next_seq: 0,
        }
    }

    fn is_live(&self, seq: u64, key: &K) -> bool {
        self.map.get(key).is_some_and(|slot| slot.seq == seq)
    }

    fn pop_oldest(&mut self) -> Option<(K, V)> {
        while let Some((seq, key)) = self.order.pop_front() {
            if self.is_live(seq, &key) {
                let slot = self.map.remove(&key)?;
                return Some((key, slot.value));
            }
        }
        None
    }

    fn insert(&mut self, key: K, value: V, maxsize: usize) -> Option<V> {
        if let Some(slot) = self.map.get_mut(&key) {
            return Some(mem::replace(&mut slot.value, value));
        }
        if self.map.len() >= maxsize && self.pop_oldest().is_some() {
            tracing::trace!(maxsize, "fifo cache full, evicted oldest entry");
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.push_back((seq, key.clone()));
        self.map.insert(key, Slot { seq, value });
        None
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.map.remove(key)?;
        if self.order.len() > 2 * self.map.len() + 16 {
            self.compact();
        }
        Some(slot.value)
    }

    fn compact(&mut self) {
        let map = &self.map;
        self.order
            .retain(|(seq, key)| map.get(key).is_some_and(|slot| slot.seq == *seq));
    }

    fn live(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter().filter_map(move |(seq, key)| {
            self.map
                .get_key_value(key)
                .filter(|(_, slot)| slot.seq == *seq)
                .map(|(k, slot)| (k, &slot.value))
        })
    }
}

/// Insertion-ordered cache with optional size bound.
pub struct FifoCache<K, V> {
    inner: RwLock<FifoInner<K, V>>,
    maxsize: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `maxsize` entries; `0` means
    /// unbounded.
    pub fn new(maxsize: usize) -> Self {
        Self::with_capacity(maxsize, 0)
    }

    /// Creates a cache and preallocates room for `capacity` entries (capped
    /// at `maxsize`).
    pub fn with_capacity(maxsize: usize, capacity: usize) -> Self {
        let maxsize = if maxsize == 0 { usize::MAX } else { maxsize };
        Self {
            inner: RwLock::new(FifoInner::with_capacity(capacity.min(maxsize))),
            maxsize,
        }
    }

    /// Creates an unbounded cache.
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Returns `true` if no size bound applies.
    pub fn is_unbounded(&self) -> bool {
        self.maxsize == usize::MAX
    }

    /// Returns the oldest key without removing it.
    pub fn first(&self) -> Option<K> {
        self.inner.read().live().next().map(|(k, _)| k.clone())
    }

    /// Returns the newest key.
    pub fn last(&self) -> Option<K> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .rev()
            .find(|(seq, key)| inner.is_live(*seq, key))
            .map(|(_, key)| key.clone())
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K, V> FromIterator<(K, V)> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let cache = Self::unbounded();
        {
            let mut inner = cache.inner.write();
            for (key, value) in iter {
                inner.insert(key, value, usize::MAX);
            }
        }
        cache
    }
}

impl<K, V> CacheView<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.read().map.get(key).map(|slot| slot.value.clone())
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.read().map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    fn maxsize(&self) -> usize {
        self.maxsize
    }

    fn capacity(&self) -> usize {
        self.inner.read().map.capacity()
    }

    fn approx_memory(&self) -> usize {
        let inner = self.inner.read();
        mem::size_of::<Self>()
            + inner.map.capacity() * (mem::size_of::<K>() + mem::size_of::<Slot<V>>())
            + inner.order.capacity() * mem::size_of::<(u64, K)>()
    }

    fn keys(&self) -> Vec<K> {
        self.inner.read().live().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.inner.read().live().map(|(_, v)| v.clone()).collect()
    }

    fn items(&self) -> Vec<(K, V)> {
        self.inner
            .read()
            .live()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V> CacheHandle<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value, self.maxsize)
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    fn setdefault(&self, key: K, default: V) -> V {
        let mut inner = self.inner.write();
        if let Some(slot) = inner.map.get(&key) {
            return slot.value.clone();
        }
        inner.insert(key, default.clone(), self.maxsize);
        default
    }

    fn popitem(&self) -> Option<(K, V)> {
        self.inner.write().pop_oldest()
    }

    fn drain(&self, n: usize) -> usize {
        let mut inner = self.inner.write();
        let mut removed = 0;
        while removed < n && inner.pop_oldest().is_some() {
            removed += 1;
        }
        removed
    }

    fn clear(&self, reuse: bool) {
        let mut inner = self.inner.write();
        if reuse {
            inner.map.clear();
            inner.order.clear();
        } else {
            inner.map = FxHashMap::default();
            inner.order = VecDeque::new();
        }
    }

    fn shrink_to_fit(&self) {
        let mut inner = self.inner.write();
        inner.compact();
        inner.map.shrink_to_fit();
        inner.order.shrink_to_fit();
    }

    fn update<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inner = self.inner.write();
        for (key, value) in entries {
            inner.insert(key, value, self.maxsize);
        }
    }
}

impl<K, V> PartialEq for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Equal when both have the same bound and the same key set.
    ///
    /// At most one of the two locks is held at any time, so concurrent
    /// `a == b` and `b == a` cannot wait on each other.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.maxsize != other.maxsize {
            return false;
        }
        let keys: Vec<K> = self.inner.read().map.keys().cloned().collect();
        let b = other.inner.read();
        keys.len() == b.map.len() && keys.iter().all(|k| b.map.contains_key(k))
    }
}

impl<K, V> fmt::Debug for FifoCache<K, V>
where
    K: fmt::Debug + Eq + Hash + Clone,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("FifoCache")
            .field("maxsize", &self.maxsize)
            .field("entries", &inner.live().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> fmt::Display for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.inner.read().map.len();
        if self.is_unbounded() {
            write!(f, "FifoCache(len={len}, maxsize=unbounded)")
        } else {
            write!(f, "FifoCache(len={len}, maxsize={})", self.maxsize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maxsize_is_unbounded() {
        let cache: FifoCache<u32, u32> = FifoCache::new(0);
        assert!(cache.is_unbounded());
        assert_eq!(cache.maxsize(), usize::MAX);
        cache.update((0..1000).map(|i| (i, i)));
        assert_eq!(cache.len(), 1000);
        assert!(!cache.is_full());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let cache = FifoCache::new(3);
        for i in 0..5 {
            cache.insert(i, i * 10);
        }
        assert_eq!(cache.keys(), vec![2, 3, 4]);
        assert!(cache.is_full());
    }

    #[test]
    fn update_keeps_position() {
        let cache = FifoCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.insert("a", 10), Some(1));
        cache.insert("c", 3);
        cache.insert("d", 4);
        assert_eq!(cache.keys(), vec!["b", "c", "d"]);
    }

    #[test]
    fn removed_keys_are_skipped_as_stale() {
        let cache = FifoCache::new(2);
        cache.insert(1, "one");
        cache.insert(2, "two");
        assert_eq!(cache.remove(&1), Some("one"));
        cache.insert(1, "uno");
        cache.insert(3, "three"); // evicts 2, the oldest live key
        assert_eq!(cache.items(), vec![(1, "uno"), (3, "three")]);
    }

    #[test]
    fn compaction_bounds_the_order_queue() {
        let cache: FifoCache<u64, u64> = FifoCache::unbounded();
        for i in 0..200 {
            cache.insert(i, i);
            cache.remove(&i);
        }
        assert!(cache.inner.read().order.len() <= 2 * cache.len() + 17);
        assert!(cache.is_empty());
    }

    #[test]
    fn popitem_and_drain_take_oldest_first() {
        let cache: FifoCache<i32, i32> = (0..6).map(|i| (i, -i)).collect();
        assert_eq!(cache.popitem(), Some((0, 0)));
        assert_eq!(cache.drain(2), 2);
        assert_eq!(cache.first(), Some(3));
        assert_eq!(cache.last(), Some(5));
        assert_eq!(cache.drain(10), 3);
        assert_eq!(cache.popitem(), None);
    }

    #[test]
    fn setdefault_is_insert_if_absent() {
        let cache = FifoCache::new(4);
        assert_eq!(cache.setdefault("k", 1), 1);
        assert_eq!(cache.setdefault("k", 2), 1);
        assert_eq!(cache.pop_or(&"k", 0), 1);
        assert_eq!(cache.pop_or(&"k", 0), 0);
    }

    #[test]
    fn clear_with_reuse_keeps_allocation() {
        let cache: FifoCache<u32, u32> = FifoCache::with_capacity(0, 64);
        cache.update((0..32).map(|i| (i, i)));
        let before = cache.capacity();
        cache.clear(true);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), before);

        cache.update((0..32).map(|i| (i, i)));
        cache.clear(false);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }

    #[test]
    fn shrink_to_fit_releases_capacity() {
        let cache: FifoCache<u32, u32> = FifoCache::with_capacity(0, 256);
        cache.insert(1, 1);
        cache.shrink_to_fit();
        assert!(cache.capacity() < 256);
        assert_eq!(cache.get(&1), Some(1));
    }

    #[test]
    fn approx_memory_grows_with_capacity() {
        let small: FifoCache<u64, u64> = FifoCache::with_capacity(0, 4);
        let large: FifoCache<u64, u64> = FifoCache::with_capacity(0, 4096);
        assert!(large.approx_memory() > small.approx_memory());
    }

    #[test]
    fn equality_compares_bound_and_keys() {
        let a: FifoCache<i32, i32> = FifoCache::new(10);
        let b: FifoCache<i32, i32> = FifoCache::new(10);
        a.insert(1, 1);
        b.insert(1, 99);
        assert!(a == b);
        b.insert(2, 2);
        assert!(a != b);
        let c: FifoCache<i32, i32> = FifoCache::new(11);
        c.insert(1, 1);
        assert!(a != c);
    }

    #[test]
    fn display_reports_len_and_bound() {
        let a: FifoCache<i32, i32> = FifoCache::new(4);
        a.insert(1, 1);
        assert_eq!(a.to_string(), "FifoCache(len=1, maxsize=4)");
        let b: FifoCache<i32, i32> = FifoCache::unbounded();
        assert_eq!(b.to_string(), "FifoCache(len=0, maxsize=unbounded)");
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(FifoCache::<u64, u64>::unbounded());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100 {
                        cache.insert(t * 1000 + i, i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
    }

    #[test]
    fn cross_comparison_with_writers_completes() {
        use std::sync::{Arc, mpsc};
        use std::thread;
        use std::time::Duration;

        let a = Arc::new(FifoCache::<u64, u64>::new(64));
        let b = Arc::new(FifoCache::<u64, u64>::new(64));
        let (done_tx, done_rx) = mpsc::channel();

        let mut handles = Vec::new();
        for flip in [false, true] {
            let (x, y) = if flip {
                (Arc::clone(&b), Arc::clone(&a))
            } else {
                (Arc::clone(&a), Arc::clone(&b))
            };
            let done = done_tx.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..2_000 {
                    let _ = *x == *y;
                }
                done.send(()).unwrap();
            }));
        }
        for cache in [Arc::clone(&a), Arc::clone(&b)] {
            let done = done_tx.clone();
            handles.push(thread::spawn(move || {
                for i in 0..2_000 {
                    cache.insert(i % 128, i);
                    if i % 3 == 0 {
                        cache.remove(&(i % 128));
                    }
                }
                done.send(()).unwrap();
            }));
        }
        drop(done_tx);

        for _ in 0..handles.len() {
            done_rx
                .recv_timeout(Duration::from_secs(10))
                .expect("comparison or writer thread stalled");
        }
        for h in handles {
            h.join().unwrap();
        }

        a.clear(false);
        b.clear(false);
        a.insert(1, 1);
        b.insert(1, 2);
        assert!(*a == *b && *b == *a);
    }
}
