//! Queue Cache - an in-memory key-value cache with a fixed TTL
//!
//! Every entry expires a fixed duration after insertion. Because the TTL is
//! uniform, insertion order is expiration order, so expired entries are
//! reclaimed by walking a plain queue from the front with one re-armed
//! timer instead of a timer per entry.
//!
//! Lookups are O(1) and never return expired values, even before the purge
//! scheduler has removed them.
//!
//! ```rust,no_run
//! use queue_cache::{CacheConfig, QueueCache};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CacheConfig::default()
//!         .with_max_purge_interval(Duration::from_secs(5));
//!     let cache = QueueCache::with_config(Duration::from_secs(60), config);
//!
//!     cache.set("user:42", "profile-blob");
//!     assert_eq!(cache.get("user:42"), Some("profile-blob"));
//! }
//! ```

pub mod cache;
pub mod config;
mod tasks;

pub use cache::{CacheStats, QueueCache};
pub use config::CacheConfig;
