//! Background worker and the single-slot instance pool.
//!
//! All heavyweight bring-up work (extraction, instance construction,
//! warm-up) runs on one serialized background worker: jobs execute strictly
//! one at a time, so no two constructions ever compete for CPU during
//! startup. Completed instances are handed over through a capacity-1 pool
//! whose backpressure enforces at-most-one-instance-ahead pre-warming.

use crate::constants::POOL_CAPACITY;
use crate::error::{Error, Result};
use crate::instance::PooledInstance;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

// =============================================================================
// Worker Pool
// =============================================================================

/// A single-worker background task pool.
///
/// Submitted jobs run to completion in submission order on one dispatcher
/// task. There is no cancellation: once submitted, a job runs until it
/// finishes or fails.
pub struct WorkerPool {
    jobs: mpsc::UnboundedSender<Job>,
}

impl WorkerPool {
    /// Spawns the dispatcher task. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (jobs, mut queue) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                job.await;
            }
            debug!("worker queue closed, dispatcher exiting");
        });
        Self { jobs }
    }

    /// Queues a job behind everything already submitted.
    pub fn submit<F>(&self, job: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.jobs
            .send(Box::pin(job))
            .map_err(|_| Error::WorkerUnavailable)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Instance Pool
// =============================================================================

/// Single-slot blocking hand-off queue of ready instances.
///
/// Invariant: at most one instance waits in the slot. A producer's `put`
/// suspends until the consumer drains the slot; that backpressure is the
/// only synchronization the pool needs.
pub struct InstancePool {
    slot_tx: mpsc::Sender<PooledInstance>,
    slot_rx: Mutex<mpsc::Receiver<PooledInstance>>,
}

impl InstancePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        let (slot_tx, slot_rx) = mpsc::channel(POOL_CAPACITY);
        Self {
            slot_tx,
            slot_rx: Mutex::new(slot_rx),
        }
    }

    /// Places a ready instance into the slot, waiting while it is occupied.
    pub async fn put(&self, instance: PooledInstance) -> Result<()> {
        self.slot_tx
            .send(instance)
            .await
            .map_err(|_| Error::PoolClosed)
    }

    /// Takes the next ready instance, waiting until one is available.
    ///
    /// Ownership of the instance transfers to the caller; the hand-off is
    /// identity-preserving, not a copy.
    pub async fn take_next(&self) -> Result<PooledInstance> {
        let mut slot = self.slot_rx.lock().await;
        slot.recv().await.ok_or(Error::PoolClosed)
    }
}

impl Default for InstancePool {
    fn default() -> Self {
        Self::new()
    }
}
