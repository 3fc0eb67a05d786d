//! Cache Module
//!
//! In-memory key-value caching with a fixed TTL and queue-based expiration.

mod entry;
mod queue_cache;
mod stats;
mod store;


// Re-export public types
pub use queue_cache::QueueCache;
pub use stats::CacheStats;

pub(crate) use entry::CacheEntry;
pub(crate) use queue_cache::CacheShared;
pub(crate) use store::CacheStore;
