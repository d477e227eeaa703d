//! TTL Cache - a concurrent in-process key/value cache
//!
//! Entries expire after a per-entry time-to-live. Expired entries are never
//! returned: a lookup that finds one removes it, and an optional background
//! sweeper periodically removes the ones nobody reads again.
//!
//! ```
//! use std::time::Duration;
//! use ttl_cache::TtlCache;
//!
//! let cache: TtlCache<&str, u32> = TtlCache::new();
//! cache.set("a", 42, Duration::from_secs(30)).unwrap();
//! assert_eq!(cache.get("a"), Some(42));
//!
//! cache.set("b", 7, Duration::ZERO).unwrap();
//! assert_eq!(cache.get("b"), None);
//! ```

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{CacheStats, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
