//! Expiring Cache - an in-process key-value cache with time-based expiry
//!
//! Bounded by sampling eviction on insert, with an optional periodic sweep
//! of expired entries, and an HTTP surface for the bundled server.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEntry, CacheStats, CacheStore, ExpiringCache, InsertOutcome};
pub use config::{CacheConfig, ServerConfig};
pub use error::{CacheError, Result};
