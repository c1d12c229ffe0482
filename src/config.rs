//! Configuration Module
//!
//! Handles loading and managing cache/batcher configuration from
//! environment variables.

use std::env;
use std::time::Duration;

/// Tuning parameters for the cache, batcher, and background sweep.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Time-to-live for cache entries in seconds
    pub ttl_secs: u64,
    /// Number of requests that triggers an immediate batch flush
    pub batch_size: usize,
    /// Delay in milliseconds before a partial batch is flushed
    pub flush_delay_ms: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 300)
    /// - `BATCH_SIZE` - Requests per full batch (default: 10)
    /// - `BATCH_FLUSH_DELAY_MS` - Partial batch flush delay (default: 100)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            batch_size: env::var("BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            flush_delay_ms: env::var("BATCH_FLUSH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }

    /// Entry TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Partial batch flush delay as a `Duration`.
    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: 1000,
            ttl_secs: 300,
            batch_size: 10,
            flush_delay_ms: 100,
            sweep_interval: 1,
        }
    }
}
