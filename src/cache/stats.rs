//! Cache Statistics Module
//!
//! Tracks hit, miss, and purge counts. Counters are atomics so `get` can
//! record outcomes while holding only the read lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful retrievals
    pub hits: u64,
    /// Number of failed retrievals (key absent or expired)
    pub misses: u64,
    /// Number of store entries removed by purge sweeps
    pub purged: u64,
    /// Current number of store entries, lingering expired ones included
    pub total_entries: usize,
    /// Current length of the expiration queue, stale references included
    pub queued: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Hits divided by total lookups, or 0.0 if there were none.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Live counters backing [`CacheStats`] snapshots.
///
/// Relaxed ordering is enough: the counts are monotonic and only read as a
/// whole in snapshots, never used for synchronization.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    purged: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_purged(&self, count: usize) {
        self.purged.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Assembles a snapshot, attaching the caller-observed sizes.
    pub(crate) fn snapshot(&self, total_entries: usize, queued: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
            total_entries,
            queued,
        }
    }
}
