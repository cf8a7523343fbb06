//! Job domain types for lookup requests waiting on the runner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use ulid::Ulid;

use crate::error::ValidationError;
use crate::result::JobResult;

/// Minimum number of characters accepted for a lookup target.
pub const MIN_TARGET_LEN: usize = 6;

/// Unique identifier for a job, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Ulid);

impl JobId {
    /// Create a new unique job ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lookup request admitted into the system.
///
/// A job carries a single result slot that is filled at most once. Whoever
/// answers first wins; every later answer is ignored, and every waiter sees
/// the winning result.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    target: String,
    created_at: DateTime<Utc>,
    result: watch::Sender<Option<JobResult>>,
}

impl Job {
    /// Create a new job for `target`.
    ///
    /// Targets shorter than [`MIN_TARGET_LEN`] characters are rejected.
    pub fn new(target: impl Into<String>) -> Result<Self, ValidationError> {
        let target = target.into();
        let len = target.chars().count();
        if len < MIN_TARGET_LEN {
            return Err(ValidationError::TargetTooShort {
                len,
                min: MIN_TARGET_LEN,
            });
        }

        let (result, _) = watch::channel(None);
        Ok(Self {
            id: JobId::new(),
            target,
            created_at: Utc::now(),
            result,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record `result` unless the job was already answered.
    ///
    /// Returns `true` when this call recorded the result.
    pub fn answer(&self, result: JobResult) -> bool {
        let mut pending = Some(result);
        self.result.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = pending.take();
            true
        })
    }

    /// Whether a result has been recorded.
    pub fn is_answered(&self) -> bool {
        self.result.borrow().is_some()
    }

    /// The recorded result, if any.
    pub fn result(&self) -> Option<JobResult> {
        self.result.borrow().clone()
    }

    /// Wait until the job has a result and return it.
    ///
    /// Returns immediately when the job is already answered.
    pub async fn wait_result(&self) -> JobResult {
        if let Some(result) = self.result() {
            return result;
        }

        let mut rx = self.result.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone().unwrap_or_else(closed_slot),
            // The sender lives inside `self`, so it cannot be dropped while we hold `&self`.
            Err(_) => closed_slot(),
        }
    }
}

fn closed_slot() -> JobResult {
    JobResult::error("Result channel closed")
}
