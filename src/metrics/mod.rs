//! Hit/miss accounting for memoized functions.
//!
//! [`counters::HitMissCounters`] records; [`snapshot::CacheInfo`] is the
//! on-demand read side.

pub mod counters;
pub mod snapshot;

pub use counters::HitMissCounters;
pub use snapshot::CacheInfo;
