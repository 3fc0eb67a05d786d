//! Queue Cache Module
//!
//! The public, concurrency-safe cache handle. Wraps the synchronous
//! [`CacheStore`] core in a reader/writer lock, owns the atomic stat
//! counters and the wake channel, and runs the background purge scheduler
//! for the lifetime of the cache.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::tasks::spawn_purge_task;

// == Shared State ==
/// State shared between cache handles' callers and the purge task.
///
/// `get`, `len`, and `stats` take the read lock; `set`, `expire_all`, and
/// the purge sweep take the write lock. The armed deadline lives inside
/// [`CacheStore`] so that "queue went non-empty, arm the scheduler" is a
/// single critical section with respect to concurrent `set` calls.
#[derive(Debug)]
pub(crate) struct CacheShared<K, V> {
    /// Fixed lifetime applied to every entry
    ttl: Duration,
    /// Floor on how far out a purge may be scheduled
    max_purge_interval: Duration,
    /// Store + queue + deadline, one consistency domain
    store: RwLock<CacheStore<K, V>>,
    /// Hit/miss/purge counters, updated without the write lock
    stats: StatsCounters,
    /// Wakes the purge task when the first timer gets armed
    pub(crate) wake: Notify,
}

impl<K, V> CacheShared<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(ttl: Duration, max_purge_interval: Duration) -> Self {
        Self {
            ttl,
            max_purge_interval,
            store: RwLock::new(CacheStore::new()),
            stats: StatsCounters::default(),
            wake: Notify::new(),
        }
    }

    // A poisoned lock only means another thread panicked mid-operation; the
    // map and queue remain structurally sound, so recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, CacheStore<K, V>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheStore<K, V>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deadline the scheduler is currently armed for, `None` when idle.
    pub(crate) fn armed_deadline(&self) -> Option<Instant> {
        self.read().deadline()
    }

    // == Purge Sweep ==
    /// Removes the expired queue prefix and re-arms (or disarms) the
    /// scheduler. Called from the purge task when the armed deadline fires.
    ///
    /// Safe against every degenerate case: an empty queue, a sweep racing an
    /// `expire_all`, and a stale deadline left behind by `expire_all` all
    /// degrade to a disarming no-op.
    pub(crate) fn sweep(&self) {
        let now = Instant::now();
        let mut store = self.write();

        let removed = store.purge_expired(now);

        // Re-arm for the new head if entries remain, applying the purge
        // interval floor; otherwise go idle until the next set
        match store.next_expiry() {
            Some(at) => {
                let delay = at
                    .saturating_duration_since(now)
                    .max(self.max_purge_interval);
                store.arm(now + delay);
            }
            None => store.disarm(),
        }

        let remaining = store.len();
        drop(store);

        if removed > 0 {
            self.stats.record_purged(removed);
            debug!(removed, remaining, "purge sweep removed expired entries");
        }
    }
}

// == Queue Cache ==
/// In-memory key-value cache with one fixed TTL for every entry.
///
/// Entries expire `ttl` after insertion. Because the TTL is uniform, the
/// internal expiration queue is ordered by construction, and a single
/// re-armed timer purges expired entries in batches instead of one timer
/// per entry. `get` checks the expiration time itself, so an expired entry
/// is never returned even while it is still waiting to be purged.
///
/// The cache is safe for concurrent use behind an `Arc`; reads run
/// concurrently with each other, writes and the purge sweep are exclusive.
///
/// # Example
///
/// ```rust,no_run
/// use queue_cache::QueueCache;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let cache: QueueCache<String, String> = QueueCache::new(Duration::from_secs(60));
///
///     cache.set("session".to_string(), "token".to_string());
///     assert_eq!(cache.get("session"), Some("token".to_string()));
/// }
/// ```
#[derive(Debug)]
pub struct QueueCache<K, V> {
    shared: Arc<CacheShared<K, V>>,
    purge_task: JoinHandle<()>,
}

impl<K, V> QueueCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache whose entries expire `ttl` after insertion, with the
    /// default configuration (purge interval floor of 1 second).
    ///
    /// A zero `ttl` is permitted: entries are expired as soon as they are
    /// stored and only ever show up in `len`.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime context. The cache needs
    /// a runtime to run its purge scheduler task.
    pub fn new(ttl: Duration) -> Self {
        Self::with_config(ttl, CacheConfig::default())
    }

    /// Creates a cache with a custom [`CacheConfig`].
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime context, with a clear
    /// message instead of a cryptic panic from `tokio::spawn`.
    pub fn with_config(ttl: Duration, config: CacheConfig) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "queue_cache::QueueCache requires a Tokio runtime. \
                 Call QueueCache::new or QueueCache::with_config from within \
                 a #[tokio::main] or #[tokio::test] context, or from code \
                 running on a Tokio runtime."
            );
        }

        let shared = Arc::new(CacheShared::new(ttl, config.max_purge_interval));
        let purge_task = spawn_purge_task(Arc::clone(&shared));

        Self { shared, purge_task }
    }

    // == Set ==
    /// Stores `value` under `key` with a fresh full TTL.
    ///
    /// Overwrite semantics: if the key already exists, its value is replaced
    /// and its remaining lifetime resets to a full TTL from now. The old
    /// entry lingers in the expiration queue until a sweep drops it, without
    /// affecting the new one.
    ///
    /// Never fails and never blocks beyond the brief write-lock hold.
    pub fn set(&self, key: K, value: V) {
        let now = Instant::now();
        let entry = Arc::new(CacheEntry::new(key.clone(), value, now + self.shared.ttl));

        let mut store = self.shared.write();
        let was_empty = store.insert(entry);
        if was_empty {
            // First entry into an empty queue arms the scheduler; the floor
            // coalesces purges when the TTL is shorter than the interval
            let delay = self.shared.ttl.max(self.shared.max_purge_interval);
            store.arm(now + delay);
        }
        drop(store);

        if was_empty {
            // Notify after unlock; the permit is retained if the purge task
            // is not parked yet, so the wakeup cannot be lost
            self.shared.wake.notify_one();
        }
    }

    // == Get ==
    /// Retrieves the value for `key`, or `None` if the key is absent or its
    /// TTL has elapsed.
    ///
    /// Read-only: expired-but-not-yet-purged entries answer `None` without
    /// being removed here. Purging stays the scheduler's job so that reads
    /// share the lock and stay flat-latency.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
        V: Clone,
    {
        let now = Instant::now();

        let store = self.shared.read();
        let value = store.get(key, now).map(|entry| entry.value.clone());
        drop(store);

        match value {
            Some(value) => {
                self.shared.stats.record_hit();
                Some(value)
            }
            None => {
                self.shared.stats.record_miss();
                None
            }
        }
    }

    // == Length ==
    /// Number of entries in the store.
    ///
    /// Deliberate approximation: entries past their TTL but not yet purged
    /// are still counted. They disappear at the latest one purge interval
    /// after expiring.
    pub fn len(&self) -> usize {
        self.shared.read().len()
    }

    /// Returns true if the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.shared.read().is_empty()
    }

    // == Expire All ==
    /// Atomically discards every entry, regardless of remaining TTL.
    ///
    /// The scheduler's pending timer is not cancelled; if it fires against
    /// the emptied cache, the sweep is a no-op and the scheduler goes idle.
    pub fn expire_all(&self) {
        self.shared.write().clear();
    }

    // == Stats ==
    /// Snapshot of hit/miss/purge counters and current sizes.
    pub fn stats(&self) -> CacheStats {
        let store = self.shared.read();
        self.shared.stats.snapshot(store.len(), store.queue_len())
    }
}

impl<K, V> Drop for QueueCache<K, V> {
    fn drop(&mut self) {
        // The purge task holds its own Arc of the shared state; stop it so
        // dropped caches don't leak a parked task
        self.purge_task.abort();
    }
}
