//! Service configuration values.

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the lookup service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Maximum number of jobs waiting in the admission queue.
    pub queue_capacity: usize,
    /// How long a caller waits for its job's result.
    pub response_timeout: Duration,
    /// How long the automation collaborator waits for each UI element.
    pub step_timeout: Duration,
    /// Address the HTTP front end listens on.
    pub listen_addr: SocketAddr,
    /// WebDriver endpoint of the automation engine.
    pub engine_url: String,
    /// Upper bound on threads available for blocking executions.
    pub blocking_threads: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 5,
            response_timeout: Duration::from_secs(30),
            step_timeout: Duration::from_secs(5),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            engine_url: "http://127.0.0.1:4723/wd/hub".to_string(),
            blocking_threads: 4,
        }
    }
}

impl ServiceConfig {
    /// Set the admission queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the response wait timeout.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Set the per-step wait timeout of the collaborator.
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Set the listen address.
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Set the automation engine URL.
    pub fn with_engine_url(mut self, url: impl Into<String>) -> Self {
        self.engine_url = url.into();
        self
    }

    /// Set the blocking thread pool size.
    pub fn with_blocking_threads(mut self, threads: usize) -> Self {
        self.blocking_threads = threads;
        self
    }

    /// Check the configuration before the service starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.response_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("response timeout"));
        }
        if self.step_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("step timeout"));
        }
        if self.blocking_threads == 0 {
            return Err(ConfigError::ZeroBlockingThreads);
        }
        if self.engine_url.trim().is_empty() {
            return Err(ConfigError::MissingEngineUrl);
        }
        Ok(())
    }
}
