use std::sync::Arc;
use std::time::Duration;

use actors::start_service;
use automation::ContactLookup;
use clap::Parser;
use lookup_core::ServiceConfig;
use server::{Args, router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// How long in-flight device sessions get to finish after the server stops.
const BLOCKING_DRAIN: Duration = Duration::from_secs(10);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config()?;

    // Device sessions run on the blocking pool, so its size bounds them.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.blocking_threads)
        .build()?;

    let result = runtime.block_on(serve(config));
    runtime.shutdown_timeout(BLOCKING_DRAIN);
    result
}

async fn serve(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let executor = Arc::new(ContactLookup::from_config(&config));
    let (gateway, runner) = start_service(&config, executor).await?;

    let app = router(gateway);
    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %config.listen_addr,
        engine_url = %config.engine_url,
        queue_capacity = config.queue_capacity,
        "Listening"
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal");
        }
    }

    runner.shutdown().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}
