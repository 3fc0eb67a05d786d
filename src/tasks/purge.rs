//! Purge Scheduler Task
//!
//! Background task driving the cache's expiration. One task per cache,
//! parked on a wake channel while idle; a single re-armed deadline stands
//! in for per-entry timers.

use std::hash::Hash;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::cache::CacheShared;

/// Spawns the purge scheduler for one cache.
///
/// The task loops over the armed deadline stored in the shared state:
/// - deadline armed: sleep until it fires, then run the purge sweep, which
///   re-arms for the new queue head or disarms when the queue drained
/// - no deadline: park on the wake channel until a `set` into an empty
///   queue arms the first timer
///
/// A wake while sleeping just re-reads the deadline, so re-arming resets
/// the pending purge instead of stacking a second one. The `Notify` permit
/// is retained if the notification races the park, so the first-arm wakeup
/// cannot be lost.
///
/// # Returns
/// A `JoinHandle` used by the cache's `Drop` to abort the task.
pub(crate) fn spawn_purge_task<K, V>(shared: Arc<CacheShared<K, V>>) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!("purge scheduler started");

        loop {
            match shared.armed_deadline() {
                Some(when) => {
                    tokio::select! {
                        _ = sleep_until(Instant::from_std(when)) => shared.sweep(),
                        _ = shared.wake.notified() => {
                            // Re-armed by a set; loop to pick up the new deadline
                        }
                    }
                }
                None => shared.wake.notified().await,
            }
        }
    })
}
