//! Error types for the TTL cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A missing or expired key is never an error; lookups report absence
/// through `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A new key was rejected because the store is at capacity
    #[error("Cache full: capacity of {capacity} entries reached")]
    CacheFull { capacity: usize },

    /// Configuration value is out of range or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The background sweeper needs a tokio runtime to run on
    #[error("No tokio runtime available to spawn the sweeper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
