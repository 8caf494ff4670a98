//! Entry points for binding functions to cache handles.
//!
//! [`cached`] and [`cachedmethod`] take a shared handle and return a
//! [`MemoBuilder`]; [`cached_default`] supplies an unbounded
//! [`FifoCache`] when the caller has none. Options are set on the builder,
//! and the finisher picks the wrapper flavour:
//!
//! ```text
//!   cached(Arc<C>) ──┐
//!   cachedmethod ────┼──► MemoBuilder ── key_maker / clear_reuse / method / name
//!   cached_default ──┘        │
//!                             ├── wrap(f)        ──► Memoized       (f: Fn(&Args) -> Result)
//!                             └── wrap_async(f)  ──► AsyncMemoized  (f: Fn(Args) -> Future)
//! ```
//!
//! The handle must implement [`CacheHandle`]; anything else, including a
//! [`Frozen`](crate::frozen::Frozen) view, is rejected at compile time:
//!
//! ```compile_fail
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use memokit::builder::cached;
//! use memokit::frozen::Frozen;
//! use memokit::key::{Args, CacheKey};
//! use memokit::store::FifoCache;
//!
//! let view = Frozen::new(Arc::new(FifoCache::<CacheKey, i64>::new(8))).unwrap();
//! let f = cached(Arc::new(view)).wrap(|_: &Args| Ok::<i64, Infallible>(1));
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::convert::Infallible;
//!
//! use memokit::args;
//! use memokit::builder::cached_default;
//! use memokit::key::{Args, TypedKey};
//!
//! let describe = cached_default::<String>()
//!     .key_maker(TypedKey)
//!     .name("describe")
//!     .wrap(|args: &Args| Ok::<_, Infallible>(format!("{:?}", args.get(0))));
//!
//! describe.call(&args!(1)).unwrap();
//! describe.call(&args!(1.0)).unwrap();
//! assert_eq!(describe.cache_info().misses, 2);
//! assert_eq!(describe.to_string(), "describe");
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::key::{Args, CacheKey, KeyMaker, PlainKey};
use crate::memo::{AsyncMemoized, MemoOptions, Memoized};
use crate::store::FifoCache;
use crate::traits::CacheHandle;

/// Binds functions to the shared handle `cache`.
pub fn cached<C>(cache: Arc<C>) -> MemoBuilder<C> {
    MemoBuilder::new(cache)
}

/// Like [`cached`], backed by a fresh unbounded [`FifoCache`].
pub fn cached_default<V>() -> MemoBuilder<FifoCache<CacheKey, V>> {
    MemoBuilder::new(Arc::new(FifoCache::unbounded()))
}

/// Like [`cached`], with method mode on: the first positional argument is
/// passed to the target but left out of the key.
pub fn cachedmethod<C>(cache: Arc<C>) -> MemoBuilder<C> {
    MemoBuilder::new(cache).method(true)
}

/// Builder for [`Memoized`] and [`AsyncMemoized`].
pub struct MemoBuilder<C, M = PlainKey> {
    cache: Arc<C>,
    key_maker: M,
    options: MemoOptions,
}

impl<C> MemoBuilder<C> {
    /// Create a builder with the default key strategy and options.
    pub fn new(cache: Arc<C>) -> Self {
        Self {
            cache,
            key_maker: PlainKey::new(),
            options: MemoOptions::default(),
        }
    }
}

impl<C, M> MemoBuilder<C, M> {
    /// Replace the key strategy.
    pub fn key_maker<N: KeyMaker>(self, key_maker: N) -> MemoBuilder<C, N> {
        MemoBuilder {
            cache: self.cache,
            key_maker,
            options: self.options,
        }
    }

    /// Flag forwarded to the handle's `clear` by `cache_clear()`.
    pub fn clear_reuse(mut self, reuse: bool) -> Self {
        self.options.clear_reuse = reuse;
        self
    }

    /// Method mode: leave the first positional argument out of the key.
    pub fn method(mut self, method: bool) -> Self {
        self.options.method = method;
        self
    }

    /// Name shown by the wrapper's `Display` and in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Accepted for older callers; has no effect.
    #[deprecated(note = "statistics are always collected; remove this call")]
    pub fn info(self, enabled: bool) -> Self {
        tracing::warn!(enabled, "MemoBuilder::info is deprecated and has no effect");
        self
    }

    /// Current options.
    pub fn options(&self) -> &MemoOptions {
        &self.options
    }

    /// Finish with a synchronous target.
    pub fn wrap<F, V, E>(self, target: F) -> Memoized<F, C, M>
    where
        F: Fn(&Args) -> Result<V, E>,
        C: CacheHandle<CacheKey, V>,
        M: KeyMaker,
        V: Clone,
    {
        Memoized::new(target, self.cache, self.key_maker, self.options)
    }

    /// Finish with an asynchronous target.
    pub fn wrap_async<F, Fut, V, E>(self, target: F) -> AsyncMemoized<F, C, M>
    where
        F: Fn(Args) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        C: CacheHandle<CacheKey, V>,
        M: KeyMaker,
        V: Clone,
    {
        AsyncMemoized::new(target, self.cache, self.key_maker, self.options)
    }
}

impl<C, M: fmt::Debug> fmt::Debug for MemoBuilder<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoBuilder")
            .field("key_maker", &self.key_maker)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
