pub use crate::args;
pub use crate::builder::{MemoBuilder, cached, cached_default, cachedmethod};
pub use crate::error::CacheError;
pub use crate::frozen::Frozen;
pub use crate::key::{ArgType, ArgValue, Args, CacheKey, HashedKey, KeyMaker, PlainKey, TypedKey};
pub use crate::memo::{AsyncMemoized, MemoOptions, Memoized};
pub use crate::metrics::CacheInfo;
pub use crate::store::FifoCache;
pub use crate::traits::{CacheHandle, CacheView};
