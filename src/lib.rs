//! Batchcache - a bounded TTL cache with request batching
//!
//! Provides two cooperating in-process components:
//! - [`BoundedCache`]: fixed-capacity key/value cache with TTL expiration
//!   and LRU eviction
//! - [`RequestBatcher`]: coalesces near-simultaneous requests sharing a
//!   grouping key into a single downstream call

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use batch::RequestBatcher;
pub use cache::BoundedCache;
pub use config::Config;
pub use error::{BatchError, ConfigError};
pub use tasks::spawn_sweep_task;
