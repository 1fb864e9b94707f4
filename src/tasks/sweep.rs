//! Periodic Sweep Task
//!
//! Background task that removes expired cache entries on a fixed interval
//! until it is told to stop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{current_timestamp, CacheStore};

/// Spawns the periodic sweep over `cache`.
///
/// The task sleeps outside the lock, then holds it only for one
/// collect-then-remove pass. It exits when `shutdown` flips or its sender is
/// dropped; a sweep already holding the lock finishes before the task exits.
///
/// # Arguments
/// * `cache` - Shared cache store
/// * `interval_secs` - Seconds between sweeps
/// * `shutdown` - Stop signal
///
/// # Example
/// ```ignore
/// let (tx, rx) = tokio::sync::watch::channel(false);
/// let handle = spawn_sweep_task(store.clone(), 1, rx);
/// // Later:
/// tx.send_replace(true);
/// handle.await?;
/// ```
pub fn spawn_sweep_task<V>(
    cache: Arc<Mutex<CacheStore<V>>>,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "Starting periodic sweep task");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let (removed, remaining) = {
                let mut guard = cache.lock().await;
                let removed = guard.sweep_expired(current_timestamp());
                (removed, guard.count())
            };

            if removed > 0 {
                info!(removed, remaining, "Sweep removed expired entries");
            } else {
                debug!(remaining, "Sweep found no expired entries");
            }
        }

        info!("Periodic sweep task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn shared_store() -> Arc<Mutex<CacheStore<String>>> {
        Arc::new(Mutex::new(CacheStore::new(CacheConfig::default())))
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache = shared_store();
        cache
            .lock()
            .await
            .put_with_expiry("expire_now".to_string(), "v".to_string(), 0);

        let (_tx, rx) = watch::channel(false);
        let handle = spawn_sweep_task(cache.clone(), 1, rx);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!cache.lock().await.exists("expire_now"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_entries() {
        let cache = shared_store();
        cache
            .lock()
            .await
            .put_with_expiry("long_lived".to_string(), "v".to_string(), 3600);

        let (_tx, rx) = watch::channel(false);
        let handle = spawn_sweep_task(cache.clone(), 1, rx);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let mut guard = cache.lock().await;
        assert_eq!(guard.get("long_lived"), Some(&"v".to_string()));
        drop(guard);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_stops_on_signal() {
        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweep_task(shared_store(), 3600, rx);

        tx.send_replace(true);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep task should stop promptly")
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_stops_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweep_task(shared_store(), 3600, rx);

        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep task should stop promptly")
            .unwrap();
    }
}
