//! Core domain types for the contact lookup service.
//!
//! This crate contains shared types used across all packages:
//! - Job and JobId for admitted lookup requests
//! - JobResult and ContactFields for their outcomes
//! - ServiceConfig for startup configuration

mod config;
mod error;
mod job;
mod result;

pub use config::ServiceConfig;
pub use error::{ConfigError, ValidationError};
pub use job::{Job, JobId, MIN_TARGET_LEN};
pub use result::{ContactFields, JobResult, ResultStatus};
