//! Shared Cache Handle
//!
//! `ExpiringCache` is the thread-safe face of `CacheStore`: every operation
//! takes one exclusive lock for its whole duration, and the handle owns the
//! optional periodic sweep.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheEntry, CacheStats, CacheStore, InsertOutcome};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

/// Stop signal and join handle of the sweep task.
#[derive(Debug)]
struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

// == Expiring Cache ==
/// Cloneable handle to a cache shared between tasks.
///
/// Operations must not be issued while another operation on the same cache is
/// awaited from inside a held guard; the lock is not reentrant.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    config: Arc<CacheConfig>,
    sweeper: Arc<Sweeper>,
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<V> ExpiringCache<V>
where
    V: Send + 'static,
{
    // == Init ==
    /// Allocates an empty cache and, when `periodic_eviction_interval > 0`,
    /// starts the sweep on the current tokio runtime.
    ///
    /// # Errors
    /// `CacheError::NoRuntime` if a sweep is configured outside a runtime.
    pub fn init(config: CacheConfig) -> Result<Self> {
        Self::from_store(CacheStore::new(config))
    }

    /// Wraps an existing store, starting its sweep as `init` does.
    pub fn from_store(store: CacheStore<V>) -> Result<Self> {
        let config = store.config().clone();
        let store = Arc::new(Mutex::new(store));
        let (shutdown, rx) = watch::channel(false);

        let handle = if config.periodic_eviction_interval > 0 {
            Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
            Some(spawn_sweep_task(
                Arc::clone(&store),
                config.periodic_eviction_interval,
                rx,
            ))
        } else {
            None
        };

        info!(
            duration = config.duration,
            max = config.max,
            n_evictions = config.n_evictions,
            n_samples = config.n_samples,
            sweep_interval = config.periodic_eviction_interval,
            "Expiring cache initialized"
        );

        Ok(Self {
            store,
            config: Arc::new(config),
            sweeper: Arc::new(Sweeper {
                shutdown,
                handle: Mutex::new(handle),
            }),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Put ==
    /// Stores `value` with the configured default duration.
    pub async fn put(&self, key: impl Into<String>, value: V) -> InsertOutcome {
        self.store.lock().await.put(key.into(), value)
    }

    /// Stores `value` expiring `duration_secs` from now. An existing key gets
    /// the new value but keeps its original expiry. Negative durations are not
    /// representable; `0` stores an already-due entry.
    pub async fn put_with_expiry(
        &self,
        key: impl Into<String>,
        value: V,
        duration_secs: u64,
    ) -> InsertOutcome {
        self.store
            .lock()
            .await
            .put_with_expiry(key.into(), value, duration_secs)
    }

    // == Delete ==
    /// Removes `key`; returns whether something was removed.
    pub async fn del(&self, key: &str) -> bool {
        self.store.lock().await.del(key)
    }

    // == Pop Random ==
    pub async fn pop_random(&self) -> Option<V> {
        self.store.lock().await.pop_random()
    }

    pub async fn pop_random_entry(&self) -> Option<CacheEntry<V>> {
        self.store.lock().await.pop_random_entry()
    }

    // == Reads ==
    pub async fn exists(&self, key: &str) -> bool {
        self.store.lock().await.exists(key)
    }

    pub async fn count(&self) -> usize {
        self.store.lock().await.count()
    }

    pub async fn expire_at(&self, key: &str) -> Option<i64> {
        self.store.lock().await.expire_at(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    // == Close ==
    /// Stops the sweep and waits for it to exit, so no sweep holds the lock
    /// once this returns. Calling it again is a no-op. The cache stays usable.
    ///
    /// # Errors
    /// `CacheError::Internal` if the sweep task panicked or was aborted.
    pub async fn close(&self) -> Result<()> {
        self.sweeper.shutdown.send_replace(true);

        let handle = self.sweeper.handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Sweep task ended abnormally");
                return Err(CacheError::Internal(format!("sweep task failed: {}", e)));
            }
        }
        Ok(())
    }
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + 'static,
{
    // == Get ==
    /// Returns a copy of the value for `key`, expired or not.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key).cloned()
    }

    // == Iteration ==
    /// Snapshot of every entry in key order. Later mutations do not show up
    /// in the returned iterator; call again for a fresh traversal.
    pub async fn iter(&self) -> std::vec::IntoIter<CacheEntry<V>> {
        let snapshot: Vec<CacheEntry<V>> = self.store.lock().await.iter().cloned().collect();
        snapshot.into_iter()
    }
}
