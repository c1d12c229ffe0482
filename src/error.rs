//! Error types for the cache and batcher
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is deliberately NOT an error: `BoundedCache::get` returns
//! `Option`. Only construction-time misuse and batch processing failures
//! are faults.

use thiserror::Error;

// == Config Error Enum ==
/// Construction-time contract violations.
///
/// These fail fast in constructors and never occur at call time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Cache capacity must hold at least one entry
    #[error("max_size must be at least 1")]
    ZeroMaxSize,

    /// A batch must hold at least one request
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
}

// == Batch Error Enum ==
/// Failures distributed to every waiter of a flushed batch.
///
/// Cloneable so a single failure can be fanned out to all members.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The caller-supplied processor returned a failure
    #[error("batch processor failed: {0}")]
    Processor(String),

    /// The processor returned a result sequence of the wrong length
    #[error("processor returned {actual} results for {expected} requests")]
    LengthMismatch {
        /// Number of payloads handed to the processor
        expected: usize,
        /// Number of results it returned
        actual: usize,
    },

    /// The batch was dropped before its result could be delivered
    #[error("batch dropped before completion")]
    Dropped,
}
