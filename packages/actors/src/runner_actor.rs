//! Runner actor that drains the admission queue one job at a time.

use std::sync::Arc;
use std::time::Instant;

use lookup_core::{Job, JobResult};
use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorProcessingErr, ActorRef, SpawnErr};

use crate::executor::Executor;
use crate::messages::RunnerMessage;
use crate::queue::QueueReceiver;

/// Detail attached to jobs whose execution faulted.
pub const EXECUTION_FAILED: &str = "Execution failed";

/// State for the runner actor.
pub struct RunnerActorState {
    /// Consumer side of the admission queue.
    queue: QueueReceiver,
    /// Collaborator performing the lookups.
    executor: Arc<dyn Executor>,
    /// Jobs executed so far.
    pub processed: u64,
    /// Jobs whose execution faulted.
    pub failed: u64,
    /// Jobs dropped because they were answered while queued.
    pub skipped: u64,
}

impl RunnerActorState {
    /// Create a new runner actor state.
    pub fn new(queue: QueueReceiver, executor: Arc<dyn Executor>) -> Self {
        Self {
            queue,
            executor,
            processed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    async fn run_job(&mut self, job: Arc<Job>) {
        let job_id = job.id();
        if job.is_answered() {
            tracing::debug!(%job_id, "Skipping job answered while queued");
            self.skipped += 1;
            return;
        }

        tracing::debug!(%job_id, target = job.target(), "Executing job");
        let started = Instant::now();
        let executor = Arc::clone(&self.executor);
        let task_job = Arc::clone(&job);
        let outcome = tokio::task::spawn_blocking(move || executor.execute(&task_job)).await;

        let fault = match outcome {
            Ok(Ok(())) if job.is_answered() => None,
            Ok(Ok(())) => Some("executor returned without answering".to_string()),
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(format!("execution task aborted: {e}")),
        };

        self.processed += 1;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match fault {
            None => {
                tracing::info!(%job_id, elapsed_ms, "Job executed");
            }
            Some(error) => {
                self.failed += 1;
                job.answer(JobResult::error(EXECUTION_FAILED));
                tracing::error!(%job_id, elapsed_ms, %error, "Job execution failed");
            }
        }
    }
}

/// Runner actor arguments.
pub struct RunnerArgs {
    pub queue: QueueReceiver,
    pub executor: Arc<dyn Executor>,
}

/// Runner actor that executes queued jobs strictly one at a time.
///
/// A `Poll` waits on the queue and turns into a `Process`; a `Process` runs
/// the job and schedules the next `Poll`. Since the actor handles one message
/// at a time, a new job is never dequeued while another is executing.
pub struct RunnerActor;

impl Actor for RunnerActor {
    type Msg = RunnerMessage;
    type State = RunnerActorState;
    type Arguments = RunnerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting lookup runner");
        myself.send_message(RunnerMessage::Poll)?;
        Ok(RunnerActorState::new(args.queue, args.executor))
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            RunnerMessage::Poll => {
                tracing::debug!("Waiting for request");
                match state.queue.dequeue().await {
                    Some(job) => myself.send_message(RunnerMessage::Process { job })?,
                    None => {
                        tracing::info!(
                            processed = state.processed,
                            failed = state.failed,
                            skipped = state.skipped,
                            "Admission queue closed, stopping runner"
                        );
                        myself.stop(None);
                    }
                }
            }

            RunnerMessage::Process { job } => {
                state.run_job(job).await;
                myself.send_message(RunnerMessage::Poll)?;
            }
        }

        Ok(())
    }
}

/// Handle to a running runner actor.
pub struct RunnerHandle {
    actor: ActorRef<RunnerMessage>,
    handle: JoinHandle<()>,
}

impl RunnerHandle {
    /// Stop the runner now, abandoning a pending dequeue.
    ///
    /// An execution already on a blocking thread runs to completion there,
    /// but its job is no longer waited on by the runner.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down lookup runner");
        self.actor.kill();
        if let Err(e) = self.handle.await {
            tracing::warn!("Runner task ended abnormally: {}", e);
        }
    }

    /// Wait for the runner to stop on its own once the queue closes.
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!("Runner task ended abnormally: {}", e);
        }
    }
}

/// Spawn the runner actor over `queue`.
pub async fn start_runner(
    queue: QueueReceiver,
    executor: Arc<dyn Executor>,
) -> Result<RunnerHandle, SpawnErr> {
    let (actor, handle) = Actor::spawn(None, RunnerActor, RunnerArgs { queue, executor }).await?;
    Ok(RunnerHandle { actor, handle })
}
