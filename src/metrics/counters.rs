use std::sync::atomic::{AtomicU64, Ordering};

/// Hit and miss counters of one memoizing wrapper.
///
/// Each counter is an independent relaxed atomic: increments never tear or
/// get lost, but a reader racing with calls may see a hit count and a miss
/// count taken at slightly different moments.
#[derive(Debug, Default)]
pub struct HitMissCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HitMissCounters {
    /// Both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one hit.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one miss.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Hits so far.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Misses so far.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Zeroes misses, then hits.
    pub fn reset(&self) {
        self.misses.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn records_and_resets() {
        let c = HitMissCounters::new();
        c.record_hit();
        c.record_miss();
        c.record_miss();
        assert_eq!((c.hits(), c.misses()), (1, 2));
        c.reset();
        assert_eq!((c.hits(), c.misses()), (0, 0));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let c = Arc::new(HitMissCounters::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        c.record_hit();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(c.hits(), 4000);
    }
}
