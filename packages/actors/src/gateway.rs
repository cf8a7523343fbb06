//! Submission gateway used by the network front end.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lookup_core::{Job, JobId, JobResult, ValidationError};

use crate::queue::AdmissionQueue;

/// Detail recorded on jobs refused by a full queue.
pub const SERVER_OVERLOADED: &str = "Server overloaded";

/// Detail recorded on jobs whose caller stopped waiting.
pub const TIMEOUT: &str = "Timeout";

/// What a caller gets back from a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The job was answered in time.
    Completed {
        job_id: JobId,
        requested_at: DateTime<Utc>,
        result: JobResult,
    },
    /// The admission queue had no room.
    Overloaded,
    /// No result arrived within the response timeout.
    Timeout,
    /// The request was malformed.
    Rejected(String),
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Completed { .. } => "completed",
            Outcome::Overloaded => "overloaded",
            Outcome::Timeout => "timeout",
            Outcome::Rejected(_) => "rejected",
        }
    }
}

/// Entry point that turns lookup requests into queued jobs and waits for
/// their results.
#[derive(Debug, Clone)]
pub struct Gateway {
    queue: AdmissionQueue,
    response_timeout: Duration,
}

impl Gateway {
    pub fn new(queue: AdmissionQueue, response_timeout: Duration) -> Self {
        Self {
            queue,
            response_timeout,
        }
    }

    /// The admission queue this gateway feeds.
    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }

    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    /// Submit a lookup for `target` and wait for its outcome.
    ///
    /// Validation failures are returned as errors; every other condition is
    /// reported through [`Outcome`].
    pub async fn submit(&self, target: impl Into<String>) -> Result<Outcome, ValidationError> {
        let job = Arc::new(Job::new(target)?);
        let job_id = job.id();
        tracing::info!(%job_id, target = job.target(), "Received lookup request");

        if let Err(e) = self.queue.try_enqueue(Arc::clone(&job)) {
            tracing::warn!(%job_id, error = %e, "Request rejected due to server overload");
            job.answer(JobResult::error(SERVER_OVERLOADED));
            return Ok(Outcome::Overloaded);
        }

        match tokio::time::timeout(self.response_timeout, job.wait_result()).await {
            Ok(result) => {
                tracing::info!(%job_id, status = %result.status(), "Request answered");
                Ok(Outcome::Completed {
                    job_id,
                    requested_at: job.created_at(),
                    result,
                })
            }
            Err(_) => {
                tracing::warn!(
                    %job_id,
                    timeout_ms = self.response_timeout.as_millis() as u64,
                    "Request timed out"
                );
                job.answer(JobResult::error(TIMEOUT));
                Ok(Outcome::Timeout)
            }
        }
    }

    /// Submit a lookup, reporting malformed requests as [`Outcome::Rejected`].
    pub async fn lookup(&self, target: impl Into<String>) -> Outcome {
        match self.submit(target).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected lookup request");
                Outcome::Rejected(e.to_string())
            }
        }
    }
}
