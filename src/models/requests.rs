//! Request DTOs for the cache HTTP API

use serde::Deserialize;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /put
///
/// # Fields
/// - `key`: The cache key
/// - `value`: The value to store
/// - `ttl`: Seconds to live; the cache's default duration when absent
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl PutRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Checks a key taken from a body or a path segment.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
