//! Actor system for the lookup service.
//!
//! This crate provides the admission queue, the Ractor-based runner that
//! drains it, and the gateway callers submit through.
//!
//! # Architecture
//!
//! - `Gateway` - Validates requests, enqueues jobs and waits for results
//! - `AdmissionQueue` - Bounded FIFO that rejects work when full
//! - `RunnerActor` - Single actor executing queued jobs one at a time
//!
//! # Usage
//!
//! ```ignore
//! use actors::{start_service, Outcome};
//!
//! let (gateway, runner) = start_service(&config, executor).await?;
//! match gateway.lookup("551199999999").await {
//!     Outcome::Completed { result, .. } => println!("{}", result.detail()),
//!     other => println!("{}", other.as_str()),
//! }
//! ```

mod executor;
mod gateway;
mod messages;
mod queue;
mod runner_actor;
mod service;

pub use executor::{ExecutionError, Executor, FnExecutor};
pub use gateway::{Gateway, Outcome, SERVER_OVERLOADED, TIMEOUT};
pub use messages::RunnerMessage;
pub use queue::{AdmissionError, AdmissionQueue, QueueReceiver, admission_queue};
pub use runner_actor::{EXECUTION_FAILED, RunnerActor, RunnerHandle, start_runner};
pub use service::{StartError, start_service};
