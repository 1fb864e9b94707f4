//! Cache Store Module
//!
//! Main cache engine combining ordered storage with sampling eviction and
//! the expired-entry sweep. Not synchronized; `ExpiringCache` wraps it in a lock.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, InsertOutcome, OrderedStore};
use crate::config::CacheConfig;

// == Cache Store ==
/// Cache storage with capacity-driven sampling eviction.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-ordered entries
    entries: OrderedStore<V>,
    /// Engine parameters
    config: CacheConfig,
    /// Read and removal counters
    stats: CacheStats,
    /// Source of eviction samples and random pops
    rng: StdRng,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store governed by `config`.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an empty store whose random choices are reproducible.
    pub fn with_seed(config: CacheConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CacheConfig, rng: StdRng) -> Self {
        Self {
            entries: OrderedStore::new(),
            config,
            stats: CacheStats::new(),
            rng,
        }
    }

    /// Parameters the store was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Put ==
    /// Stores `value` under `key` with the configured default duration.
    pub fn put(&mut self, key: String, value: V) -> InsertOutcome {
        let duration = self.config.duration;
        self.put_with_expiry(key, value, duration)
    }

    /// Stores `value` under `key`, expiring `duration_secs` from now.
    /// Durations are unsigned, so an entry cannot be stored already past its
    /// expiry; `0` makes it due immediately.
    ///
    /// Capacity eviction runs first, even when `key` is already present.
    /// Updating an existing key replaces its value only: the entry keeps the
    /// expiry it was created with.
    pub fn put_with_expiry(&mut self, key: String, value: V, duration_secs: u64) -> InsertOutcome {
        self.evict_for_capacity();

        let outcome = self
            .entries
            .insert(CacheEntry::new(key, value, duration_secs));

        if self.config.is_bounded() && self.entries.len() > self.config.max {
            warn!(
                count = self.entries.len(),
                max = self.config.max,
                n_evictions = self.config.n_evictions,
                "Cache above capacity after eviction"
            );
        }

        self.stats.set_total_entries(self.entries.len());
        outcome
    }

    // == Get ==
    /// Returns the value for `key`. Expiry is not checked: an entry stays
    /// readable until eviction or the sweep removes it.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.entries.find(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(&entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was removed.
    pub fn del(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Pop Random ==
    /// Removes and returns a uniformly random entry.
    pub fn pop_random_entry(&mut self) -> Option<CacheEntry<V>> {
        if self.entries.is_empty() {
            return None;
        }

        let pos = self.rng.gen_range(0..self.entries.len());
        let entry = self.entries.remove_at(pos)?;
        self.stats.record_pop();
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    /// Removes a uniformly random entry and returns its value.
    pub fn pop_random(&mut self) -> Option<V> {
        self.pop_random_entry().map(|entry| entry.value)
    }

    // == Exists ==
    /// Presence check with the same expiry semantics as `get`.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Absolute expiry (Unix seconds) of `key`.
    pub fn expire_at(&self, key: &str) -> Option<i64> {
        self.entries.find(key).map(|entry| entry.expire_at)
    }

    // == Count ==
    /// Number of entries, expired or not.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Iteration ==
    /// Walks every entry in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<V>> + '_ {
        self.entries.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Capacity Eviction ==
    /// Makes room for an insert when the store is at `max`.
    ///
    /// Runs `n_evictions` sampling rounds, stopping early only when the store
    /// empties. Returns the number of entries evicted.
    pub fn evict_for_capacity(&mut self) -> usize {
        if !self.config.is_bounded() || self.entries.len() < self.config.max {
            return 0;
        }

        let mut evicted = 0;
        for _ in 0..self.config.n_evictions {
            if self.evict_sample().is_none() {
                break;
            }
            evicted += 1;
        }

        debug!(evicted, remaining = self.entries.len(), "Capacity eviction");
        evicted
    }

    /// One eviction round: draws `n_samples` random slots (with replacement)
    /// and removes the sampled entry closest to expiring. Ties go to the
    /// first one drawn.
    pub fn evict_sample(&mut self) -> Option<CacheEntry<V>> {
        if self.entries.is_empty() {
            return None;
        }

        let len = self.entries.len();
        let mut victim: Option<(usize, i64)> = None;

        for _ in 0..self.config.effective_samples() {
            let pos = self.rng.gen_range(0..len);
            let expire_at = self.entries.at(pos)?.expire_at;
            match victim {
                Some((_, best)) if best <= expire_at => {}
                _ => victim = Some((pos, expire_at)),
            }
        }

        let (pos, _) = victim?;
        let entry = self.entries.remove_at(pos)?;
        self.stats.record_capacity_eviction();
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }

    // == Sweep Expired ==
    /// Removes every entry with `expire_at <= now`.
    ///
    /// Due keys are collected in a first pass and removed in a second, so the
    /// store is never mutated while it is being walked. Returns the number of
    /// entries removed.
    pub fn sweep_expired(&mut self, now: i64) -> usize {
        let due: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &due {
            self.entries.remove(key);
        }

        self.stats.record_expirations(due.len());
        self.stats.set_total_entries(self.entries.len());
        due.len()
    }
}
