//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types; the entry and recency structures stay internal
pub use stats::CacheStats;
pub use store::BoundedCache;

pub(crate) use entry::CacheEntry;
pub(crate) use lru::LruTracker;
