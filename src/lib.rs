//! memokit: function memoization over pluggable cache handles.
//!
//! A wrapper derives a key from each call's arguments, answers repeat calls
//! from a shared handle and records hit/miss statistics. Handles are any type
//! implementing [`traits::CacheHandle`]; [`store::FifoCache`] is the bundled
//! one. [`frozen::Frozen`] gives read-only access to a handle.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use memokit::prelude::*;
//!
//! let fib = cached_default::<u64>().name("fib").wrap(|args: &Args| {
//!     let n = args.get(0).and_then(ArgValue::as_int).unwrap_or(0);
//!     let (mut a, mut b) = (0_u64, 1_u64);
//!     for _ in 0..n {
//!         (a, b) = (b, a + b);
//!     }
//!     Ok::<_, Infallible>(a)
//! });
//!
//! assert_eq!(fib.call(&args!(50)), Ok(12_586_269_025));
//! assert_eq!(fib.call(&args!(50)), Ok(12_586_269_025));
//! assert_eq!(fib.cache_info().hits, 1);
//! ```

pub mod builder;
pub mod compat;
pub mod error;
pub mod frozen;
pub mod key;
pub mod memo;
pub mod metrics;
pub mod prelude;
pub mod store;
pub mod traits;

pub use crate::builder::{MemoBuilder, cached, cached_default, cachedmethod};
pub use crate::error::CacheError;
pub use crate::frozen::Frozen;
pub use crate::memo::{AsyncMemoized, Memoized};
pub use crate::metrics::CacheInfo;
pub use crate::store::FifoCache;
