//! Configuration Module
//!
//! Options applied at cache construction.

use std::time::Duration;

/// Configuration for a [`QueueCache`](crate::QueueCache).
///
/// Built with `Default` plus `with_*` setters:
///
/// ```rust
/// use queue_cache::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::default()
///     .with_max_purge_interval(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Floor on how far out a purge sweep may be scheduled (default: 1 second)
    pub max_purge_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_purge_interval: Duration::from_secs(1),
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the purge interval floor.
    ///
    /// This balances purge frequency against lingering memory: with a floor
    /// of zero each entry is purged right at its TTL, while a floor of 10
    /// seconds lets expired entries sit for up to 10 extra seconds in
    /// exchange for far fewer sweeps when many entries expire close
    /// together. It never affects `get`, which checks expiration itself.
    pub fn with_max_purge_interval(mut self, interval: Duration) -> Self {
        self.max_purge_interval = interval;
        self
    }
}
