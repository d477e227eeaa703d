//! TTL Cache Module
//!
//! Thread-safe cache handle: a `Store` behind a single reader-writer lock,
//! lazy reclamation on lookup and an optional background sweeper.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::cache::stats::StatsRecorder;
use crate::cache::store::{Lookup, Store};
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::{spawn_sweep_task, Sweep, SweepHandle};

/// State shared between the cache handle and its sweep task.
struct Inner<K, T> {
    store: RwLock<Store<K, T>>,
    stats: StatsRecorder,
}

impl<K, T> Inner<K, T>
where
    K: Eq + Hash,
{
    fn new(max_entries: Option<usize>) -> Self {
        Self {
            store: RwLock::new(Store::new(max_entries)),
            stats: StatsRecorder::default(),
        }
    }

    fn sweep(&self) -> usize {
        let removed = self.store.write().purge_expired(Instant::now());
        self.stats.record_swept(removed);
        removed
    }
}

impl<K, T> Sweep for Inner<K, T>
where
    K: Eq + Hash + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn sweep_expired(&self) -> usize {
        self.sweep()
    }
}

/// Result of the shared-lock half of a lookup.
enum ReadOutcome<T> {
    Hit(T),
    Miss,
    Stale,
}

// == TTL Cache ==
/// A concurrent key/value cache whose entries expire after a per-entry TTL.
///
/// Expired entries are never returned. They are removed by the lookup that
/// finds them and, when a sweeper is running, by a periodic background pass.
/// Share the cache between threads or tasks by wrapping it in an `Arc`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_cache::TtlCache;
///
/// let cache: TtlCache<String, u64> = TtlCache::new();
/// cache.set("answer".to_string(), 42, Duration::from_secs(60)).unwrap();
///
/// assert_eq!(cache.get("answer"), Some(42));
/// cache.delete("answer");
/// assert_eq!(cache.get("answer"), None);
/// ```
pub struct TtlCache<K, T> {
    inner: Arc<Inner<K, T>>,
    sweeper: Mutex<Option<SweepHandle>>,
}

impl<K, T> TtlCache<K, T>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty, unbounded cache with lazy reclamation only.
    ///
    /// No background task is started, so no runtime is needed. Call
    /// [`sweep`](Self::sweep) to reclaim unread expired entries manually.
    pub fn new() -> Self {
        Self::lazy(None)
    }

    fn lazy(max_entries: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner::new(max_entries)),
            sweeper: Mutex::new(None),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// A zero `ttl` stores an entry that is already expired. On an unbounded
    /// cache this never fails; a bounded cache returns `CacheFull` when a new
    /// key does not fit even after purging expired entries.
    pub fn set(&self, key: K, value: T, ttl: Duration) -> Result<()> {
        // Bound so a displaced value is dropped after the lock is released.
        let outcome = self.inner.store.write().set(key, value, ttl, Instant::now());

        match outcome {
            Ok(inserted) => {
                self.inner.stats.record_swept(inserted.purged);
                Ok(())
            }
            Err(err) => {
                self.inner.stats.record_rejected();
                debug!(%err, "Insert rejected");
                Err(err)
            }
        }
    }

    // == Get ==
    /// Returns a clone of the value if the key is present and fresh.
    ///
    /// An expired entry found here is removed before returning `None`. For
    /// shared-ownership values such as `Arc<_>`, the returned handle aliases
    /// the cached value; the cache cannot stop callers mutating through
    /// interior mutability.
    pub fn get<Q>(&self, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        T: Clone,
    {
        let store = self.inner.store.read();
        let outcome = match store.lookup(key, Instant::now()) {
            Lookup::Fresh(value) => ReadOutcome::Hit(value.clone()),
            Lookup::Missing => ReadOutcome::Miss,
            Lookup::Expired => ReadOutcome::Stale,
        };
        drop(store);

        match outcome {
            ReadOutcome::Hit(value) => {
                self.inner.stats.record_hit();
                Some(value)
            }
            ReadOutcome::Miss => {
                self.inner.stats.record_miss();
                None
            }
            ReadOutcome::Stale => {
                // Re-checked under the write lock: a concurrent set may have
                // refreshed the entry since the read lock was released.
                let reclaimed = self
                    .inner
                    .store
                    .write()
                    .remove_if_expired(key, Instant::now());
                if reclaimed {
                    self.inner.stats.record_lazy_reclaim();
                    trace!("Reclaimed expired entry on lookup");
                }
                self.inner.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes the entry for `key`, if any. Deleting a missing key is a no-op.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        // Bound so the old value is dropped after the lock is released.
        let _removed = self.inner.store.write().remove(key);
    }

    // == Sweep ==
    /// Removes every expired entry now. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let removed = self.inner.sweep();
        debug!(removed, "Manual TTL sweep");
        removed
    }

    // == Contains Key ==
    /// Returns true if the key is present and fresh. Never mutates.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(
            self.inner.store.read().lookup(key, Instant::now()),
            Lookup::Fresh(_)
        )
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a fresh entry, or None if absent or expired.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.store.read().ttl_remaining(key, Instant::now())
    }

    // == Clear ==
    /// Removes all entries, fresh or expired.
    pub fn clear(&self) {
        let dropped = self.inner.store.write().clear();
        debug!(dropped, "Cache cleared");
    }

    // == Length ==
    /// Number of stored entries, including expired entries not yet reclaimed.
    pub fn len(&self) -> usize {
        self.inner.store.read().len()
    }

    // == Is Empty ==
    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.store.read().is_empty()
    }

    /// The configured capacity, if bounded.
    pub fn max_entries(&self) -> Option<usize> {
        self.inner.store.read().max_entries()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total_entries = self.len();
        self.inner.stats.snapshot(total_entries)
    }

    // == Sweeper Control ==
    /// True while a background sweeper is running for this cache.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(SweepHandle::is_running)
    }

    /// Signals the background sweeper to stop.
    ///
    /// Returns false if there was no sweeper or it was already stopped. The
    /// stop signal wakes the task immediately, but this call does not wait
    /// for it to finish; use [`shutdown`](Self::shutdown) for that.
    pub fn stop_sweeper(&self) -> bool {
        self.sweeper.lock().as_mut().is_some_and(|handle| handle.stop())
    }

    /// Stops the background sweeper and waits for the task to finish.
    pub async fn shutdown(&self) {
        let handle = self.sweeper.lock().take();
        if let Some(handle) = handle {
            handle.join().await;
        }
    }
}

impl<K, T> TtlCache<K, T>
where
    K: Eq + Hash + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Creates an unbounded cache with a background sweeper running every
    /// `interval`.
    ///
    /// # Errors
    /// - `InvalidConfig` if `interval` is zero
    /// - `NoRuntime` if called outside a tokio runtime
    pub fn with_sweep_interval(interval: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig {
            sweep_interval: interval,
            active_sweep: true,
            max_entries: None,
        })
    }

    /// Creates a cache from a validated configuration.
    ///
    /// A sweeper is started only when `config.active_sweep` is set, and then
    /// requires a tokio runtime.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let cache = Self::lazy(config.max_entries);
        if config.active_sweep {
            let handle = spawn_sweep_task(Arc::downgrade(&cache.inner), config.sweep_interval)?;
            *cache.sweeper.lock() = Some(handle);
        }
        Ok(cache)
    }
}

impl<K, T> Default for TtlCache<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Drop for TtlCache<K, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().as_mut() {
            handle.stop();
        }
    }
}

impl<K, T> fmt::Debug for TtlCache<K, T>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.inner.store.read().len())
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
