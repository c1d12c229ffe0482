//! Batch Module
//!
//! Coalesces near-simultaneous requests sharing a grouping key into a
//! single downstream call, fanning results back out to each waiter in
//! submission order.

mod batcher;

pub use batcher::RequestBatcher;
