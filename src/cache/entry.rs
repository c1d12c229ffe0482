//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.
//!
//! Entries carry their insertion instant; freshness is judged against the
//! cache-wide TTL. A read never refreshes `inserted_at` - only `set` does.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the stored value plus its insertion instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Instant of the last write (monotonic)
    inserted_at: Instant,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    pub fn new(value: T) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's age exceeds `ttl`.
    ///
    /// The comparison is strict: an entry aged exactly `ttl` is still fresh.
    /// With `ttl == 0` any real elapsed time exceeds zero, so every read
    /// misses - the documented degenerate configuration.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() > ttl
    }
}
