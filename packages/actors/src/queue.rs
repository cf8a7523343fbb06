//! Bounded admission queue between the gateway and the runner.

use std::sync::Arc;

use lookup_core::{ConfigError, Job};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Reasons a job can be refused admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("admission queue is full")]
    QueueFull,

    #[error("admission queue is closed")]
    Closed,
}

/// Producer side of the admission queue.
///
/// Cloning shares the same underlying queue. The queue closes once every
/// clone has been dropped.
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    tx: mpsc::Sender<Arc<Job>>,
}

/// Consumer side of the admission queue, owned by the runner.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::Receiver<Arc<Job>>,
}

/// Create an admission queue holding at most `capacity` pending jobs.
pub fn admission_queue(capacity: usize) -> Result<(AdmissionQueue, QueueReceiver), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((AdmissionQueue { tx }, QueueReceiver { rx }))
}

impl AdmissionQueue {
    /// Push a job without waiting for room.
    pub fn try_enqueue(&self, job: Arc<Job>) -> Result<(), AdmissionError> {
        self.tx.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => AdmissionError::QueueFull,
            TrySendError::Closed(_) => AdmissionError::Closed,
        })
    }

    /// Maximum number of pending jobs.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of jobs currently waiting.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueueReceiver {
    /// Wait for the next job in FIFO order.
    ///
    /// Returns `None` once every producer is gone and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<Arc<Job>> {
        self.rx.recv().await
    }
}
