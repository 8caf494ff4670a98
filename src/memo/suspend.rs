use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::key::{Args, CacheKey, KeyMaker, PlainKey};
use crate::memo::{MemoOptions, MemoState};
use crate::metrics::CacheInfo;
use crate::traits::CacheHandle;

/// An asynchronous function bound to a cache handle.
///
/// Lookup and store run synchronously against the handle; the only await is
/// the target itself. Built with
/// [`MemoBuilder::wrap_async`](crate::builder::MemoBuilder::wrap_async).
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
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetch = cached(Arc::new(FifoCache::new(16))).wrap_async(|args: Args| async move {
///     let id = args.get(0).and_then(|v| v.as_int()).unwrap_or(0);
///     Ok::<_, Infallible>(format!("user-{id}"))
/// });
///
/// assert_eq!(fetch.call(args!(7)).await.unwrap(), "user-7");
/// assert_eq!(fetch.call(args!(7)).await.unwrap(), "user-7");
/// assert_eq!(fetch.cache_info().hits, 1);
/// # }
/// ```
pub struct AsyncMemoized<F, C, M = PlainKey> {
    target: F,
    state: MemoState<C, M>,
}

impl<F, C, M> AsyncMemoized<F, C, M>
where
    M: KeyMaker,
{
    pub(crate) fn new(target: F, cache: Arc<C>, key_maker: M, options: MemoOptions) -> Self {
        let state = MemoState::new(cache, key_maker, options);
        tracing::debug!(
            func = state.name(),
            method = state.options().method,
            "async memoized function created"
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

impl<F, Fut, C, M, V, E> AsyncMemoized<F, C, M>
where
    F: Fn(Args) -> Fut,
    Fut: Future<Output = Result<V, E>>,
    C: CacheHandle<CacheKey, V>,
    M: KeyMaker,
    V: Clone,
{
    /// Returns the cached result for `args`, or awaits the target and caches
    /// what it returns.
    ///
    /// Dropping the returned future before the target finishes stores
    /// nothing; the miss it already counted stays counted.
    pub async fn call(&self, args: Args) -> Result<V, E> {
        let key = self.state.key_for(&args);
        if let Some(value) = self.state.lookup::<V>(&key) {
            return Ok(value);
        }
        let value = (self.target)(args).await?;
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

impl<F, C, M> fmt::Display for AsyncMemoized<F, C, M>
where
    M: KeyMaker,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state.name())
    }
}

impl<F, C, M> fmt::Debug for AsyncMemoized<F, C, M>
where
    M: KeyMaker + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncMemoized")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
