//! Wiring for the queue, the runner and the gateway.

use std::sync::Arc;

use lookup_core::{ConfigError, ServiceConfig};

use crate::executor::Executor;
use crate::gateway::Gateway;
use crate::queue::admission_queue;
use crate::runner_actor::{RunnerHandle, start_runner};

/// Error starting the lookup service.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn runner: {0}")]
    Spawn(#[from] ractor::SpawnErr),
}

/// Start the lookup service with the given executor.
///
/// Returns the gateway to submit through and the handle of the single
/// runner draining its queue. The runner stops by itself once every gateway
/// clone is dropped.
pub async fn start_service(
    config: &ServiceConfig,
    executor: Arc<dyn Executor>,
) -> Result<(Gateway, RunnerHandle), StartError> {
    config.validate()?;

    let (queue, receiver) = admission_queue(config.queue_capacity)?;
    let runner = start_runner(receiver, executor).await?;

    tracing::info!(
        queue_capacity = config.queue_capacity,
        response_timeout_ms = config.response_timeout.as_millis() as u64,
        "Lookup service started"
    );

    Ok((Gateway::new(queue, config.response_timeout), runner))
}
