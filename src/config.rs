//! Configuration Module
//!
//! Cache and server configuration, loaded from environment variables.

use std::env;

/// Parses an environment variable, falling back to `default` when it is
/// absent or not parsable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Cache engine parameters. All values are fixed once the cache is initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Default seconds-to-live applied by `put`
    pub duration: u64,
    /// Entry ceiling enforced on insert, 0 = unbounded
    pub max: usize,
    /// Sampling-eviction rounds per over-capacity insert
    pub n_evictions: usize,
    /// Candidates inspected per eviction round, 0 is treated as 1
    pub n_samples: usize,
    /// Seconds between background sweeps, 0 disables the sweep
    pub periodic_eviction_interval: u64,
}

impl CacheConfig {
    /// Loads cache parameters from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DURATION` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX` - Maximum entries, 0 = unbounded (default: 0)
    /// - `CACHE_EVICTIONS` - Eviction rounds per full insert (default: 1)
    /// - `CACHE_SAMPLES` - Samples per eviction round (default: 1)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep period in seconds, 0 = off (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            duration: env_or("CACHE_DURATION", defaults.duration),
            max: env_or("CACHE_MAX", defaults.max),
            n_evictions: env_or("CACHE_EVICTIONS", defaults.n_evictions),
            n_samples: env_or("CACHE_SAMPLES", defaults.n_samples),
            periodic_eviction_interval: env_or(
                "CACHE_SWEEP_INTERVAL",
                defaults.periodic_eviction_interval,
            ),
        }
    }

    /// Sample size actually used by an eviction round.
    pub fn effective_samples(&self) -> usize {
        self.n_samples.max(1)
    }

    /// Whether inserts are bounded by `max`.
    pub fn is_bounded(&self) -> bool {
        self.max > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration: 300,
            max: 0,
            n_evictions: 1,
            n_samples: 1,
            periodic_eviction_interval: 0,
        }
    }
}

/// Configuration of the HTTP binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Parameters of the served cache
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
}

impl ServerConfig {
    /// Loads the cache parameters plus `SERVER_PORT` (default: 3000).
    pub fn from_env() -> Self {
        Self {
            cache: CacheConfig::from_env(),
            server_port: env_or("SERVER_PORT", 3000),
        }
    }
}
