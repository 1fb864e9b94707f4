//! Cache Module
//!
//! In-memory key-value cache with absolute expiry, capacity-driven sampling
//! eviction and an optional periodic sweep.

mod entry;
mod expiring;
mod ordered;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp, CacheEntry};
pub use expiring::ExpiringCache;
pub use ordered::{InsertOutcome, OrderedStore};
pub use stats::CacheStats;
pub use store::CacheStore;
