use std::fmt;

/// Point-in-time statistics of a memoized function.
///
/// Built fresh by `cache_info()` on every call; never stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,

    // gauges read from the handle at snapshot time
    pub maxsize: usize,
    pub length: usize,
    pub memory: usize,
}

impl CacheInfo {
    /// Total calls counted since the last reset.
    pub fn calls(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of calls served from the cache, or `None` before any call.
    pub fn hit_ratio(&self) -> Option<f64> {
        match self.calls() {
            0 => None,
            calls => Some(self.hits as f64 / calls as f64),
        }
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheInfo(hits={}, misses={}, maxsize={}, length={}, memory={})",
            self.hits, self.misses, self.maxsize, self.length, self.memory
        )
    }
}
