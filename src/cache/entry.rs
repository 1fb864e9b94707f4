//! Cache Entry Module
//!
//! Defines a stored key/value pair annotated with its absolute expiry.

use chrono::Utc;
use serde::Serialize;

// == Cache Entry ==
/// A single cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry<V> {
    /// Unique key, the only ordering criterion in the store
    pub key: String,
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix seconds)
    pub expire_at: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `duration_secs` seconds from now.
    pub fn new(key: String, value: V, duration_secs: u64) -> Self {
        Self::with_expiry(key, value, expiry_from_now(duration_secs))
    }

    /// Creates an entry with an explicit absolute expiry.
    pub fn with_expiry(key: String, value: V, expire_at: i64) -> Self {
        Self {
            key,
            value,
            expire_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is due at `now`.
    ///
    /// An entry is due once `now` reaches `expire_at`, so a zero-duration
    /// entry is already expired when it is stored.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expire_at <= now
    }

    /// Seconds left before expiry, 0 once due.
    pub fn ttl_remaining(&self) -> u64 {
        self.expire_at.saturating_sub(current_timestamp()).max(0) as u64
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Absolute expiry for a duration starting now, saturating on overflow.
pub fn expiry_from_now(duration_secs: u64) -> i64 {
    let duration = i64::try_from(duration_secs).unwrap_or(i64::MAX);
    current_timestamp().saturating_add(duration)
}
