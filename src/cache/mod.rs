//! Cache Module
//!
//! Provides the concurrent in-memory cache with TTL expiration.

mod entry;
mod stats;
mod store;
mod ttl_cache;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{Inserted, Lookup, Store};
pub use ttl_cache::TtlCache;
