//! Cache Store Module
//!
//! The synchronous core of the cache: a HashMap store paired with an
//! insertion-ordered expiration queue and the purge scheduler's armed
//! deadline. The three fields form one consistency domain and are always
//! mutated together under the owning cache's write lock.
//!
//! Because every entry shares the same TTL, insertion order and expiration
//! order coincide: the queue is always sorted by `expires_at` ascending
//! without any priority structure, and a purge sweep only ever removes a
//! prefix.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Store + expiration queue + scheduler deadline.
///
/// All methods take an explicit `now` so the purge and lookup logic can be
/// unit-tested deterministically, without sleeping.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Authoritative view: at most one entry per key
    entries: HashMap<K, Arc<CacheEntry<K, V>>>,
    /// Entries in insertion order, which is also expiration order
    queue: VecDeque<Arc<CacheEntry<K, V>>>,
    /// When the purge scheduler is armed to fire; `None` means idle
    deadline: Option<Instant>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty store with the scheduler disarmed.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            queue: VecDeque::new(),
            deadline: None,
        }
    }

    // == Insert ==
    /// Installs `entry` as the current entry for its key, unconditionally
    /// replacing any prior entry, and appends it to the queue tail.
    ///
    /// The replaced entry (if any) stays in the queue as dead weight until a
    /// sweep drops it; the identity check in [`purge_expired`] keeps it from
    /// deleting the replacement.
    ///
    /// Returns `true` if the queue was empty before the append, which is the
    /// caller's signal to arm the purge scheduler.
    ///
    /// [`purge_expired`]: CacheStore::purge_expired
    pub fn insert(&mut self, entry: Arc<CacheEntry<K, V>>) -> bool {
        let was_empty = self.queue.is_empty();

        self.entries.insert(entry.key.clone(), Arc::clone(&entry));
        self.queue.push_back(entry);

        was_empty
    }

    // == Get ==
    /// Looks up the live entry for `key` as of `now`.
    ///
    /// Expired-but-not-yet-purged entries are invisible: the expiry check on
    /// read is what guarantees correctness, the queue is only a lazy cleanup
    /// mechanism. Never mutates the store.
    pub fn get<Q>(&self, key: &Q, now: Instant) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(Arc::as_ref)
    }

    // == Purge Expired ==
    /// Removes the expired prefix of the queue and the matching store
    /// entries. Safe no-op on an empty queue.
    ///
    /// A drained queue entry deletes its key from the store only when the
    /// store still holds that exact entry (pointer identity): an overwrite
    /// may have replaced the store's entry while the stale queue entry was
    /// pending removal, and the fresh entry must survive.
    ///
    /// Returns the number of store entries removed. Cost is O(k) in the
    /// number of expired queue entries, not O(n).
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let mut offset = 0;
        while let Some(entry) = self.queue.get(offset) {
            if !entry.is_expired(now) {
                break;
            }
            offset += 1;
        }

        let mut removed = 0;
        for stale in self.queue.drain(..offset) {
            if let Some(current) = self.entries.get(&stale.key) {
                if Arc::ptr_eq(current, &stale) {
                    self.entries.remove(&stale.key);
                    removed += 1;
                }
            }
        }

        removed
    }

    // == Next Expiry ==
    /// Absolute expiration time of the queue head, if any.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.front().map(|entry| entry.expires_at)
    }

    // == Scheduler Deadline ==
    /// Arms the purge scheduler for the given instant, superseding any
    /// previously armed deadline.
    pub fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Disarms the scheduler (queue drained, nothing left to purge).
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// The currently armed deadline, `None` when idle.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    // == Clear ==
    /// Discards every entry from both store and queue.
    ///
    /// The armed deadline is deliberately left alone: a stale timer firing
    /// against the emptied structures degrades to a no-op sweep.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }

    // == Length ==
    /// Number of entries in the store, lingering expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries in the expiration queue, stale references included.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(key: &str, value: &str, expires_at: Instant) -> Arc<CacheEntry<String, String>> {
        Arc::new(CacheEntry::new(
            key.to_string(),
            value.to_string(),
            expires_at,
        ))
    }

    #[test]
    fn test_store_new_is_empty_and_disarmed() {
        let store: CacheStore<String, String> = CacheStore::new();

        assert_eq!(store.len(), 0);
        assert_eq!(store.queue_len(), 0);
        assert!(store.is_empty());
        assert!(store.deadline().is_none());
    }

    #[test]
    fn test_store_insert_and_get() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        let was_empty = store.insert(entry("key1", "value1", now + Duration::from_secs(60)));

        assert!(was_empty);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key1", now).unwrap().value, "value1");
    }

    #[test]
    fn test_store_insert_reports_empty_queue_only_once() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        assert!(store.insert(entry("key1", "value1", now + Duration::from_secs(60))));
        assert!(!store.insert(entry("key2", "value2", now + Duration::from_secs(60))));
    }

    #[test]
    fn test_store_get_expired_entry_is_invisible() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        store.insert(entry("key1", "value1", now + Duration::from_millis(10)));

        // Still in the store, but past its deadline: invisible to get
        let later = now + Duration::from_millis(20);
        assert!(store.get("key1", later).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store: CacheStore<String, String> = CacheStore::new();
        assert!(store.get("missing", Instant::now()).is_none());
    }

    #[test]
    fn test_store_overwrite_replaces_store_entry_and_appends() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        store.insert(entry("key1", "value1", now + Duration::from_secs(1)));
        store.insert(entry("key1", "value2", now + Duration::from_secs(2)));

        assert_eq!(store.get("key1", now).unwrap().value, "value2");
        // One store entry, but both generations sit in the queue
        assert_eq!(store.len(), 1);
        assert_eq!(store.queue_len(), 2);
    }

    #[test]
    fn test_store_purge_removes_expired_prefix() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        store.insert(entry("key1", "value1", now + Duration::from_millis(10)));
        store.insert(entry("key2", "value2", now + Duration::from_millis(20)));
        store.insert(entry("key3", "value3", now + Duration::from_millis(300)));

        let removed = store.purge_expired(now + Duration::from_millis(50));

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.queue_len(), 1);
        assert_eq!(store.next_expiry(), Some(now + Duration::from_millis(300)));
    }

    #[test]
    fn test_store_purge_spares_overwritten_key() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        // First generation expires at +10ms, overwrite at +300ms
        store.insert(entry("key1", "value1", now + Duration::from_millis(10)));
        store.insert(entry("key1", "value2", now + Duration::from_millis(300)));

        // Sweep past the first generation's expiry: the stale queue entry is
        // dropped, but the fresh store entry must survive
        let removed = store.purge_expired(now + Duration::from_millis(50));

        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.queue_len(), 1);
        assert_eq!(
            store.get("key1", now + Duration::from_millis(50)).unwrap().value,
            "value2"
        );
    }

    #[test]
    fn test_store_purge_empty_queue_is_noop() {
        let mut store: CacheStore<String, String> = CacheStore::new();
        assert_eq!(store.purge_expired(Instant::now()), 0);
    }

    #[test]
    fn test_store_purge_nothing_expired() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        store.insert(entry("key1", "value1", now + Duration::from_secs(60)));

        assert_eq!(store.purge_expired(now), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.queue_len(), 1);
    }

    #[test]
    fn test_store_purge_drains_everything_when_all_expired() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        for i in 0..10 {
            store.insert(entry(
                &format!("key{i}"),
                "value",
                now + Duration::from_millis(i),
            ));
        }

        let removed = store.purge_expired(now + Duration::from_secs(1));

        assert_eq!(removed, 10);
        assert!(store.is_empty());
        assert_eq!(store.queue_len(), 0);
        assert!(store.next_expiry().is_none());
    }

    #[test]
    fn test_store_clear_keeps_deadline() {
        let now = Instant::now();
        let mut store = CacheStore::new();

        store.insert(entry("key1", "value1", now + Duration::from_secs(60)));
        store.arm(now + Duration::from_secs(60));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.queue_len(), 0);
        // A stale deadline is allowed; the sweep it triggers is a no-op
        assert!(store.deadline().is_some());
    }

    #[test]
    fn test_store_arm_supersedes_previous_deadline() {
        let now = Instant::now();
        let mut store: CacheStore<String, String> = CacheStore::new();

        store.arm(now + Duration::from_secs(10));
        store.arm(now + Duration::from_secs(1));

        assert_eq!(store.deadline(), Some(now + Duration::from_secs(1)));

        store.disarm();
        assert!(store.deadline().is_none());
    }
}
