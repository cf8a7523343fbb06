//! Execution collaborator trait.

use lookup_core::Job;

/// Failure raised by an executor instead of answering its job.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("could not open automation session: {0}")]
    Session(String),

    #[error("execution failed: {0}")]
    Failed(String),
}

/// Trait for the collaborator that performs a lookup.
///
/// `execute` runs on a blocking thread. It must answer the job before
/// returning `Ok`, or return an error which the runner turns into an error
/// result.
pub trait Executor: Send + Sync + 'static {
    /// Perform the lookup for `job.target()` and answer the job.
    fn execute(&self, job: &Job) -> Result<(), ExecutionError>;
}

/// A simple function-based executor.
pub struct FnExecutor<F>
where
    F: Fn(&Job) -> Result<(), ExecutionError> + Send + Sync + 'static,
{
    executor: F,
}

impl<F> FnExecutor<F>
where
    F: Fn(&Job) -> Result<(), ExecutionError> + Send + Sync + 'static,
{
    /// Create a new function-based executor.
    pub fn new(executor: F) -> Self {
        Self { executor }
    }
}

impl<F> Executor for FnExecutor<F>
where
    F: Fn(&Job) -> Result<(), ExecutionError> + Send + Sync + 'static,
{
    fn execute(&self, job: &Job) -> Result<(), ExecutionError> {
        (self.executor)(job)
    }
}
