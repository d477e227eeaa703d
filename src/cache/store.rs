//! Cache Store Module
//!
//! Unsynchronized storage engine: a HashMap of TTL-stamped entries with an
//! optional capacity limit. `TtlCache` wraps it in a reader-writer lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Lookup ==
/// Outcome of a read-only lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// The key is present and has not expired
    Fresh(&'a T),
    /// The key is present but its TTL has elapsed
    Expired,
    /// The key is not in the store
    Missing,
}

// == Inserted ==
/// Outcome of a successful insert.
#[derive(Debug, PartialEq, Eq)]
pub struct Inserted<T> {
    /// Value previously stored under the key, fresh or expired
    pub replaced: Option<T>,
    /// Number of expired entries purged to make room
    pub purged: usize,
}

// == Store ==
/// Key to entry storage with TTL bookkeeping.
#[derive(Debug)]
pub struct Store<K, T> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<T>>,
    /// Maximum number of entries, None = unbounded
    max_entries: Option<usize>,
}

impl<K, T> Store<K, T>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_entries` - Optional capacity; new keys are rejected once reached
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores a value that expires `ttl` after `now`.
    ///
    /// Overwrites any existing entry for the key. When the store is bounded
    /// and full, expired entries are purged first; if there is still no room
    /// for a new key the insert is rejected.
    ///
    /// # Returns
    /// The displaced value, handed back so the caller decides where it is
    /// dropped, and the number of expired entries purged to make room.
    pub fn set(&mut self, key: K, value: T, ttl: Duration, now: Instant) -> Result<Inserted<T>> {
        let mut purged = 0;

        if let Some(capacity) = self.max_entries {
            if self.entries.len() >= capacity && !self.entries.contains_key(&key) {
                purged = self.purge_expired(now);
                if self.entries.len() >= capacity {
                    return Err(CacheError::CacheFull { capacity });
                }
            }
        }

        let replaced = self
            .entries
            .insert(key, CacheEntry::new(value, ttl, now))
            .map(|entry| entry.value);
        Ok(Inserted { replaced, purged })
    }

    // == Lookup ==
    /// Classifies a key without mutating the store.
    pub fn lookup<Q>(&self, key: &Q, now: Instant) -> Lookup<'_, T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => Lookup::Expired,
            Some(entry) => Lookup::Fresh(&entry.value),
            None => Lookup::Missing,
        }
    }

    // == Remove If Expired ==
    /// Removes the entry only if it is expired as of `now`.
    ///
    /// Returns true if an entry was removed.
    pub fn remove_if_expired<Q>(&mut self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));

        if expired {
            self.entries.remove(key);
        }
        expired
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|entry| entry.value)
    }

    // == Purge Expired ==
    /// Removes all entries expired as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a fresh entry; never-expiring entries report
    /// `Duration::MAX`. Expired and missing keys yield None.
    pub fn ttl_remaining<Q>(&self, key: &Q, now: Instant) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining_at(now).unwrap_or(Duration::MAX))
    }

    // == Clear ==
    /// Removes every entry, expired or not. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones that
    /// have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured capacity, if any.
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }
}
