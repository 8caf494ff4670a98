use std::fmt;
use std::sync::Arc;

use crate::key::{Args, CacheKey, KeyMaker, PlainKey};
use crate::memo::{MemoOptions, MemoState};
use crate::metrics::CacheInfo;
use crate::traits::CacheHandle;

/// A synchronous function bound to a cache handle.
///
/// Built with [`cached`](crate::builder::cached) or
/// [`cachedmethod`](crate::builder::cachedmethod).
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// use memokit::args;
/// use memokit::builder::cached;
/// use memokit::key::Args;
/// use memokit::store::FifoCache;
///
/// let square = cached(Arc::new(FifoCache::new(128))).wrap(|args: &Args| {
///     let n = args.get(0).and_then(|v| v.as_int()).unwrap_or(0);
///     Ok::<_, Infallible>(n * n)
/// });
///
/// assert_eq!(square.call(&args!(12)), Ok(144));
/// assert_eq!(square.call(&args!(12)), Ok(144));
///
/// let info = square.cache_info();
/// assert_eq!((info.hits, info.misses, info.length), (1, 1, 1));
/// ```
pub struct Memoized<F, C, M = PlainKey> {
    target: F,
    state: MemoState<C, M>,
}

impl<F, C, M> Memoized<F, C, M>
where
    M: KeyMaker,
{
    pub(crate) fn new(target: F, cache: Arc<C>, key_maker: M, options: MemoOptions) -> Self {
        let state = MemoState::new(cache, key_maker, options);
        tracing::debug!(
            func = state.name(),
            method = state.options().method,
            "memoized function created"
        );
        Self { target, state }
    }

    /// The key a call with `args` looks up.
    pub fn key_for(&self, args: &Args) -> CacheKey {
        self.state.key_for(args)
    }

    /// The shared cache handle.
    pub fn cache(&self) -> &Arc<C> {
        self.state.cache()
    }

    /// The wrapped function.
    pub fn target(&self) -> &F {
        &self.target
    }

    /// Options fixed at build time.
    pub fn options(&self) -> &MemoOptions {
        self.state.options()
    }
}

impl<F, C, M, V, E> Memoized<F, C, M>
where
    F: Fn(&Args) -> Result<V, E>,
    C: CacheHandle<CacheKey, V>,
    M: KeyMaker,
    V: Clone,
{
    /// Returns the cached result for `args`, or runs the target and caches
    /// what it returns.
    ///
    /// A target error is returned as-is and nothing is stored; the call still
    /// counts as a miss.
    pub fn call(&self, args: &Args) -> Result<V, E> {
        let key = self.state.key_for(args);
        if let Some(value) = self.state.lookup::<V>(&key) {
            return Ok(value);
        }
        let value = (self.target)(args)?;
        self.state.store(key, &value);
        Ok(value)
    }

    /// Fresh statistics snapshot.
    pub fn cache_info(&self) -> CacheInfo {
        self.state.info::<V>()
    }

    /// Clears the handle and zeroes both counters.
    pub fn cache_clear(&self) {
        self.state.clear::<V>();
    }
}

impl<F, C, M> fmt::Display for Memoized<F, C, M>
where
    M: KeyMaker,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state.name())
    }
}

impl<F, C, M> fmt::Debug for Memoized<F, C, M>
where
    M: KeyMaker + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
