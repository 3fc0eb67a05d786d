//! Cache Entry Module
//!
//! Defines the immutable record stored for each key, carrying its absolute
//! expiration time.

use std::time::Instant;

// == Cache Entry ==
/// A single cached record.
///
/// Entries are immutable once created: overwriting a key builds a fresh
/// `CacheEntry` rather than mutating the old one, so a stale reference left
/// in the expiration queue can be told apart from the store's current entry
/// by pointer identity.
#[derive(Debug)]
pub struct CacheEntry<K, V> {
    /// The key this entry was stored under, kept for purge-time removal
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration time (insertion time + cache TTL)
    pub expires_at: Instant,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring at the given absolute instant.
    ///
    /// The caller computes `expires_at = now + ttl`; taking the absolute
    /// time here keeps the type testable without sleeping.
    pub fn new(key: K, value: V, expires_at: Instant) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`,
    /// so a key stored at time T with TTL D is already gone at exactly
    /// `T + D`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
