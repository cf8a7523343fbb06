//! Error types shared across the lookup service.

use thiserror::Error;

/// Malformed input supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target must be at least {min} characters long, got {len}")]
    TargetTooShort { len: usize, min: usize },

    #[error("invalid result status: {0}")]
    UnknownStatus(String),
}

/// Invalid service configuration detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("queue capacity must be at least 1")]
    ZeroCapacity,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("blocking thread pool must have at least 1 thread")]
    ZeroBlockingThreads,

    #[error("automation engine URL must not be empty")]
    MissingEngineUrl,
}
