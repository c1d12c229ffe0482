//! Request Batcher Module
//!
//! Reduces N near-simultaneous logical requests sharing a grouping key to
//! one downstream call, without reordering or dropping any caller's result.
//!
//! Each grouping key moves through three states:
//! - **Idle**: no map entry for the key
//! - **Accumulating**: a pending batch exists; requests append to it and a
//!   flush timer is armed
//! - **Flushing**: the batch has been removed from the map and its
//!   processor is running; a new batch for the same key may start at once
//!
//! A batch flushes exactly once. Whoever removes the batch from the map
//! owns the flush: either the enqueue call that fills it to `batch_size`,
//! or the timer task armed when the batch was created. Timers carry the id
//! of the batch they were armed for and stand down if the key now maps to
//! a successor batch, so a dangling timer can never flush twice.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{BatchError, ConfigError};

/// Boxed future returned by a type-erased processor.
type BoxFuture<R> = Pin<Box<dyn Future<Output = Result<Vec<R>, BatchError>> + Send>>;

/// Type-erased processor stored with a pending batch.
///
/// The processor supplied by the call that opens a batch is the one that
/// runs at flush time; processors passed by later joiners of the same
/// batch are dropped unused.
type BoxedProcessor<P, R> = Box<dyn FnOnce(Vec<P>) -> BoxFuture<R> + Send>;

// == Pending Batch ==
/// One accumulating batch for a grouping key.
struct PendingBatch<P, R> {
    /// Monotonic id distinguishing this batch from successors on the same key
    id: u64,
    /// Queued requests in submission order; index i receives result i
    requests: Vec<(P, oneshot::Sender<Result<R, BatchError>>)>,
    /// Downstream call to make at flush time
    processor: BoxedProcessor<P, R>,
    /// Armed flush timer; aborted when a size-triggered flush wins
    timer: JoinHandle<()>,
}

struct BatcherInner<P, R> {
    /// Accumulating batches by grouping key
    batches: HashMap<String, PendingBatch<P, R>>,
    /// Source of batch ids
    next_id: u64,
}

// == Request Batcher ==
/// Coalesces requests sharing a grouping key into one downstream call.
///
/// A batch flushes when it reaches `batch_size` requests or when
/// `flush_delay` elapses since its first request, whichever comes first.
/// Grouping keys are fully independent: a flush for one key never blocks
/// another key's batch.
pub struct RequestBatcher<P, R> {
    inner: Arc<Mutex<BatcherInner<P, R>>>,
    batch_size: usize,
    flush_delay: Duration,
}

impl<P, R> std::fmt::Debug for RequestBatcher<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBatcher")
            .field("batch_size", &self.batch_size)
            .field("flush_delay", &self.flush_delay)
            .finish_non_exhaustive()
    }
}

impl<P, R> Clone for RequestBatcher<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            batch_size: self.batch_size,
            flush_delay: self.flush_delay,
        }
    }
}

impl<P, R> RequestBatcher<P, R>
where
    P: Send + 'static,
    R: Send + 'static,
{
    // == Constructor ==
    /// Creates a new RequestBatcher.
    ///
    /// # Arguments
    /// * `batch_size` - Number of requests that triggers an immediate flush (>= 1)
    /// * `flush_delay` - How long a partial batch waits before flushing;
    ///   `Duration::ZERO` flushes on the next timer turn
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroBatchSize` if `batch_size` is 0.
    pub fn new(batch_size: usize, flush_delay: Duration) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(BatcherInner {
                batches: HashMap::new(),
                next_id: 0,
            })),
            batch_size,
            flush_delay,
        })
    }

    /// Creates a RequestBatcher from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ConfigError> {
        Self::new(config.batch_size, config.flush_delay())
    }

    // == Enqueue ==
    /// Joins (or opens) the batch for `group_key` and resolves with this
    /// request's individual result once the batch flushes.
    ///
    /// The first call for an idle key opens a batch and arms its flush
    /// timer. The call that fills the batch to `batch_size` flushes it
    /// inline, before any other queued caller resolves. The processor runs
    /// exactly once per batch, receiving payloads in submission order and
    /// returning results in the same order; each caller resolves with the
    /// result at its own submission index.
    ///
    /// # Errors
    /// - `BatchError::Processor` if the processor fails; every member of
    ///   the batch receives the same error
    /// - `BatchError::LengthMismatch` if the processor returns a result
    ///   sequence whose length differs from the batch size
    pub async fn enqueue<F, Fut, E>(
        &self,
        group_key: &str,
        payload: P,
        processor: F,
    ) -> Result<R, BatchError>
    where
        F: FnOnce(Vec<P>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<R>, E>> + Send + 'static,
        E: Display,
    {
        let (tx, rx) = oneshot::channel();

        let ready = {
            let mut inner = self.inner.lock().await;

            // Idle -> Accumulating: open a batch and arm its timer
            if !inner.batches.contains_key(group_key) {
                let id = inner.next_id;
                inner.next_id = inner.next_id.wrapping_add(1);

                let boxed: BoxedProcessor<P, R> = Box::new(move |payloads| -> BoxFuture<R> {
                    Box::pin(async move {
                        processor(payloads)
                            .await
                            .map_err(|e| BatchError::Processor(e.to_string()))
                    })
                });
                let timer = Self::spawn_flush_timer(
                    Arc::clone(&self.inner),
                    group_key.to_string(),
                    id,
                    self.flush_delay,
                );
                inner.batches.insert(
                    group_key.to_string(),
                    PendingBatch {
                        id,
                        requests: Vec::new(),
                        processor: boxed,
                        timer,
                    },
                );
            }

            let is_full = if let Some(batch) = inner.batches.get_mut(group_key) {
                batch.requests.push((payload, tx));
                batch.requests.len() >= self.batch_size
            } else {
                false
            };

            // Accumulating -> Flushing: the filling call owns the flush
            if is_full {
                inner.batches.remove(group_key)
            } else {
                None
            }
        };

        if let Some(batch) = ready {
            batch.timer.abort();
            Self::flush(group_key, batch).await;
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(BatchError::Dropped),
        }
    }

    // == Flush Timer ==
    /// Arms the time-based flush for a freshly opened batch.
    ///
    /// After `delay`, the timer flushes the batch it was armed for - and
    /// only that one. If the key is idle or already maps to a successor
    /// batch (different id), the timer stands down.
    fn spawn_flush_timer(
        inner: Arc<Mutex<BatcherInner<P, R>>>,
        group_key: String,
        batch_id: u64,
        delay: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let expired = {
                let mut guard = inner.lock().await;
                let armed_for = guard
                    .batches
                    .get(&group_key)
                    .map(|batch| batch.id == batch_id)
                    .unwrap_or(false);
                if armed_for {
                    guard.batches.remove(&group_key)
                } else {
                    None
                }
            };

            if let Some(batch) = expired {
                Self::flush(&group_key, batch).await;
            }
        })
    }

    // == Flush ==
    /// Runs the batch's processor once and distributes results to waiters
    /// by submission index. All-or-nothing: on failure every waiter gets
    /// the same error.
    async fn flush(group_key: &str, batch: PendingBatch<P, R>) {
        let PendingBatch {
            requests, processor, ..
        } = batch;

        let (payloads, senders): (Vec<P>, Vec<_>) = requests.into_iter().unzip();
        let expected = payloads.len();
        debug!(group_key, size = expected, "flushing batch");

        match processor(payloads).await {
            Ok(results) if results.len() == expected => {
                for (sender, result) in senders.into_iter().zip(results) {
                    // Waiter may have gone away; nothing to do
                    let _ = sender.send(Ok(result));
                }
            }
            Ok(results) => {
                let err = BatchError::LengthMismatch {
                    expected,
                    actual: results.len(),
                };
                warn!(group_key, %err, "batch processor contract violation");
                for sender in senders {
                    let _ = sender.send(Err(err.clone()));
                }
            }
            Err(err) => {
                warn!(group_key, %err, "batch processor failed");
                for sender in senders {
                    let _ = sender.send(Err(err.clone()));
                }
            }
        }
    }

    // == Pending ==
    /// Number of requests queued in the accumulating batch for `group_key`
    /// (0 if the key is idle).
    pub async fn pending(&self, group_key: &str) -> usize {
        let inner = self.inner.lock().await;
        inner
            .batches
            .get(group_key)
            .map(|batch| batch.requests.len())
            .unwrap_or(0)
    }

    // == Accessors ==
    /// The configured size-based flush threshold.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The configured time-based flush delay.
    pub fn flush_delay(&self) -> Duration {
        self.flush_delay
    }
}
