//! Memoizing wrappers.
//!
//! ## Call Contract
//!
//! ```text
//!   call(args)
//!     │
//!     ├── key = key_maker(method ? args[1..] : args, kwargs)
//!     │
//!     ├── handle.get(key) ── Some(v) ──► hits += 1 ──► return v
//!     │
//!     └── None ──► misses += 1
//!                    │
//!                    ├── target(args)      (receiver included)
//!                    │     ├── Err(e) ──► return Err(e)     nothing stored
//!                    │     └── Ok(v)
//!                    │
//!                    └── handle.insert(key, v) ──► return v
//! ```
//!
//! [`Memoized`] runs this in the caller's thread. [`AsyncMemoized`] runs the
//! same steps but awaits the target; that await is its only suspension point.
//!
//! ## Concurrency
//!
//! Calls on one wrapper are not serialized. Two callers that miss on the same
//! key at the same time both invoke the target and both store; the later
//! store wins. There is no single-flight guarantee.
//!
//! Counters are relaxed atomics, so `cache_info()` read while calls are in
//! flight can pair a hit count and a miss count from slightly different
//! moments. `cache_clear()` clears the handle, then zeroes `misses`, then
//! `hits`; a concurrent `cache_info()` can land between those steps.
//!
//! ## Cancellation
//!
//! Dropping an [`AsyncMemoized::call`] future while the target is pending
//! stores nothing and leaves `hits` alone. `misses` was already incremented
//! before the target started, so a cancelled call still counts as a miss.

mod suspend;
mod wrapper;

use std::fmt;
use std::sync::Arc;

pub use suspend::AsyncMemoized;
pub use wrapper::Memoized;

use crate::key::{Args, CacheKey, KeyMaker};
use crate::metrics::{CacheInfo, HitMissCounters};
use crate::traits::{CacheHandle, CacheView};

/// Options a wrapper is built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoOptions {
    /// Passed to the handle's `clear` by `cache_clear()`.
    pub clear_reuse: bool,
    /// Leave the first positional argument (the receiver) out of the key.
    pub method: bool,
    /// Label used by `Display` and in log events.
    pub name: Option<String>,
}

/// State shared by the sync and async wrappers.
pub(crate) struct MemoState<C, M> {
    cache: Arc<C>,
    key_maker: M,
    counters: HitMissCounters,
    options: MemoOptions,
}

impl<C, M> MemoState<C, M>
where
    M: KeyMaker,
{
    pub(crate) fn new(cache: Arc<C>, key_maker: M, options: MemoOptions) -> Self {
        Self {
            cache,
            key_maker,
            counters: HitMissCounters::new(),
            options,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or("<memoized fn>")
    }

    pub(crate) fn key_for(&self, args: &Args) -> CacheKey {
        let positional = if self.options.method {
            args.after_receiver()
        } else {
            args.positional()
        };
        self.key_maker.make_key(positional, args.keywords())
    }

    /// Looks the key up and counts the outcome.
    pub(crate) fn lookup<V>(&self, key: &CacheKey) -> Option<V>
    where
        C: CacheView<CacheKey, V>,
    {
        match self.cache.get(key) {
            Some(value) => {
                self.counters.record_hit();
                tracing::trace!(func = self.name(), %key, "memo hit");
                Some(value)
            },
            None => {
                self.counters.record_miss();
                tracing::trace!(func = self.name(), %key, "memo miss");
                None
            },
        }
    }

    pub(crate) fn store<V>(&self, key: CacheKey, value: &V)
    where
        C: CacheHandle<CacheKey, V>,
        V: Clone,
    {
        tracing::trace!(func = self.name(), %key, "memo store");
        self.cache.insert(key, value.clone());
    }

    pub(crate) fn info<V>(&self) -> CacheInfo
    where
        C: CacheView<CacheKey, V>,
    {
        CacheInfo {
            hits: self.counters.hits(),
            misses: self.counters.misses(),
            maxsize: self.cache.maxsize(),
            length: self.cache.len(),
            memory: self.cache.approx_memory(),
        }
    }

    pub(crate) fn clear<V>(&self)
    where
        C: CacheHandle<CacheKey, V>,
    {
        self.cache.clear(self.options.clear_reuse);
        self.counters.reset();
        tracing::debug!(func = self.name(), reuse = self.options.clear_reuse, "memo cache cleared");
    }

    pub(crate) fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    pub(crate) fn options(&self) -> &MemoOptions {
        &self.options
    }
}

impl<C, M> fmt::Debug for MemoState<C, M>
where
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoState")
            .field("key_maker", &self.key_maker)
            .field("hits", &self.counters.hits())
            .field("misses", &self.counters.misses())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
