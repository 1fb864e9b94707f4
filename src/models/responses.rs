//! Response DTOs for the cache HTTP API

use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// A key with its value, returned by GET /get/:key and POST /pop
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: String,
}

impl ValueResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Acknowledgement for PUT /put and DELETE /del/:key
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub key: String,
}

impl MessageResponse {
    pub fn stored(key: impl Into<String>, updated: bool) -> Self {
        let key = key.into();
        let verb = if updated { "updated" } else { "stored" };
        Self {
            message: format!("Key '{}' {}", key, verb),
            key,
        }
    }

    pub fn deleted(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Key '{}' deleted", key)
        } else {
            format!("Key '{}' was not present", key)
        };
        Self { message, key }
    }
}

/// Response body for GET /exists/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for GET /count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// One element of GET /entries
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: String,
    /// Absolute expiry, Unix seconds
    pub expire_at: i64,
    /// Seconds until expiry, 0 once due
    pub ttl_remaining: u64,
}

impl From<CacheEntry<String>> for EntryResponse {
    fn from(entry: CacheEntry<String>) -> Self {
        let ttl_remaining = entry.ttl_remaining();
        Self {
            key: entry.key,
            value: entry.value,
            expire_at: entry.expire_at,
            ttl_remaining,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
