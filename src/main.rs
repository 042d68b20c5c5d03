//! Droidprox - Entry Point
//!
//! Starts the API server with graceful shutdown support.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::{watch, Mutex};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod bridge;
mod config;
mod coordinator;
mod error;
mod models;
mod registry;
mod telemetry;

use api::ApiServer;
use bridge::AdbBridge;
use config::Config;
use coordinator::AssignmentCoordinator;
use registry::ProxyRegistry;
use telemetry::{BufferLayer, LogBuffer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("invalid configuration")?;

    // Initialize tracing; the buffer layer mirrors events into the ring
    // buffer served at /api/logs
    let log_buffer = Arc::new(LogBuffer::new(config.log.buffer_capacity));
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("droidprox={},tower_http=debug", config.log.level).into());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(BufferLayer::new(log_buffer.clone()));

    if config.log.format == "json" {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting droidprox");

    // Open the registry (creates empty documents on first run)
    let registry = ProxyRegistry::open(&config.storage.data_dir);
    info!(
        "Registry opened at {}",
        config.storage.data_dir.display()
    );

    // Locate the device bridge
    let adb = Arc::new(AdbBridge::new(&config.bridge));

    let coordinator = Arc::new(Mutex::new(AssignmentCoordinator::new(registry, adb)));

    // Create API server
    let api_server = ApiServer::new(config.api.clone(), coordinator, log_buffer);

    // Create shutdown channel
    let (shutdown_tx, _) = watch::channel(false);
    let api_shutdown = shutdown_tx.subscribe();

    let api_task = tokio::spawn(async move {
        if let Err(e) = api_server.run(api_shutdown).await {
            error!("API server error: {}", e);
        }
    });

    info!("API server started on {}", config.api_addr());

    // Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    let _ = tokio::join!(api_task);

    info!("droidprox stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
