//! Cache backends shipped with the crate.
//!
//! Only the default insertion-ordered handle lives here. Any type
//! implementing [`CacheHandle`](crate::traits::CacheHandle) can back a
//! memoized function.

pub mod fifo;

pub use fifo::FifoCache;
