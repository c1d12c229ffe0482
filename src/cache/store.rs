//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration.
//!
//! Expiry is lazy: a stale entry is only removed when a read touches it (or
//! when `purge_expired` sweeps). Consequently `len()` may overcount by
//! including entries whose TTL has elapsed but which no read has visited
//! yet - a documented approximation.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::ConfigError;

// == Bounded Cache ==
/// Fixed-capacity cache with cache-wide TTL and LRU eviction.
///
/// The cache exclusively owns its entries; `get` hands out clones, never
/// references into internal storage. Reads promote an entry's eviction
/// recency but do not refresh its TTL age - only `set` does that.
#[derive(Debug)]
pub struct BoundedCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Maximum entry age before a read treats it as absent
    ttl: Duration,
}

impl<T: Clone> BoundedCache<T> {
    // == Constructor ==
    /// Creates a new BoundedCache with the given capacity and TTL.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the cache can hold (>= 1)
    /// * `ttl` - Maximum entry age; `Duration::ZERO` is valid and makes
    ///   every read a miss
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroMaxSize` if `max_size` is 0.
    pub fn new(max_size: usize, ttl: Duration) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_size,
            ttl,
        })
    }

    /// Creates a BoundedCache from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ConfigError> {
        Self::new(config.max_size, config.ttl())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` on a miss - the key is absent, or present but older
    /// than the TTL (in which case the stale entry is removed). A hit
    /// promotes the key to most-recently-used.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        // Lazy expiry on read
        if entry.is_expired(self.ttl) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Some(value)
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is overwritten and its TTL age
    /// resets. If the cache is at capacity and the key is new, exactly one
    /// entry - the least recently used - is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        // If not overwriting and at capacity, evict the LRU entry
        if !is_overwrite && self.entries.len() >= self.max_size {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                tracing::debug!(key = %evicted_key, "evicted LRU entry at capacity");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns `true` if the key was present. Deleting an absent key is a
    /// no-op, never an error.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Eagerly removes all expired entries.
    ///
    /// Returns the number of entries removed. Callers that need `len()` to
    /// be exact rather than approximate can sweep first.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current entry count.
    ///
    /// Does not trigger an expiry sweep, so the count may include stale
    /// entries that no read has lazily removed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Accessors ==
    /// The configured capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
