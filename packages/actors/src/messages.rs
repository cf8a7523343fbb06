//! Message types for actor communication.

use std::sync::Arc;

use lookup_core::Job;

/// Messages for the RunnerActor.
#[derive(Debug)]
pub enum RunnerMessage {
    /// Wait for the next job in the admission queue.
    Poll,

    /// Execute a job taken from the queue.
    Process { job: Arc<Job> },
}
