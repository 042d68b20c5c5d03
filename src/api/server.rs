//! API server using Axum
//!
//! Serializes every request through a single coordinator mutex so the
//! registry files see one read-modify-write at a time.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::sync::{watch, Mutex};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiServerConfig;
use crate::coordinator::AssignmentCoordinator;
use crate::error::Result;
use crate::telemetry::LogBuffer;

use super::middleware::cors_layer;
use super::routes;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Mutex<AssignmentCoordinator>>,
    pub log_buffer: Arc<LogBuffer>,
    pub started_at: Instant,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(
        config: ApiServerConfig,
        coordinator: Arc<Mutex<AssignmentCoordinator>>,
        log_buffer: Arc<LogBuffer>,
    ) -> Self {
        let state = AppState {
            coordinator,
            log_buffer,
            started_at: Instant::now(),
        };

        Self { config, state }
    }

    /// Build the router
    fn build_router(&self) -> Router {
        let cors = cors_layer(&self.config.cors_origins);

        routes::create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                crate::error::DroidProxError::InvalidConfig("Invalid API server address".into())
            })?;

        let router = self.build_router();

        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .map_err(|e| crate::error::DroidProxError::Internal(e.to_string()))?;

        info!("API server shut down");
        Ok(())
    }
}
