//! Command-line arguments.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use lookup_core::{ConfigError, ServiceConfig};

#[derive(Debug, Parser)]
#[command(name = "lookup-server", version, about = "Contact lookup service")]
pub struct Args {
    /// Port to listen on, overriding the port of --listen
    pub port: Option<u16>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "LOOKUP_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Maximum number of requests waiting for the runner
    #[arg(long, env = "LOOKUP_QUEUE_CAPACITY", default_value_t = 5)]
    pub queue_capacity: usize,

    /// Seconds a request waits for its result
    #[arg(long, env = "LOOKUP_RESPONSE_TIMEOUT_SECS", default_value_t = 30)]
    pub response_timeout_secs: u64,

    /// Seconds to wait for each element on the device
    #[arg(long, env = "LOOKUP_STEP_TIMEOUT_SECS", default_value_t = 5)]
    pub step_timeout_secs: u64,

    /// WebDriver endpoint of the automation engine
    #[arg(long, env = "LOOKUP_ENGINE_URL", default_value = "http://127.0.0.1:4723/wd/hub")]
    pub engine_url: String,

    /// Threads available for device sessions
    #[arg(long, env = "LOOKUP_BLOCKING_THREADS", default_value_t = 4)]
    pub blocking_threads: usize,
}

impl Args {
    /// Build and validate the service configuration.
    pub fn config(&self) -> Result<ServiceConfig, ConfigError> {
        let mut listen = self.listen;
        if let Some(port) = self.port {
            listen.set_port(port);
        }

        let config = ServiceConfig::default()
            .with_listen_addr(listen)
            .with_queue_capacity(self.queue_capacity)
            .with_response_timeout(Duration::from_secs(self.response_timeout_secs))
            .with_step_timeout(Duration::from_secs(self.step_timeout_secs))
            .with_engine_url(self.engine_url.clone())
            .with_blocking_threads(self.blocking_threads);
        config.validate()?;
        Ok(config)
    }
}
