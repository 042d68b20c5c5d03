//! Proxy pool handlers

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::AppState;
use crate::models::{AddProxiesRequest, DeleteProxiesRequest, StatusResponse};

/// List the persisted proxy pool
pub async fn list_proxies(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = state.coordinator.lock().await;
    Json(coordinator.load_proxies())
}

/// Merge proxies into the pool; malformed entries are dropped and logged
///
/// Accepts a single proxy string or a list under the `proxies` key.
pub async fn add_proxies(
    State(state): State<AppState>,
    Json(req): Json<AddProxiesRequest>,
) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.add_proxies(&req.proxies.into_vec());
    Json(StatusResponse::new(success))
}

/// Remove the listed proxies from the pool, releasing their bindings
pub async fn delete_proxies(
    State(state): State<AppState>,
    Json(req): Json<DeleteProxiesRequest>,
) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.delete_proxies(&req.proxies);
    Json(StatusResponse::new(success))
}

/// Wipe the pool and every binding
pub async fn delete_all_proxies(State(state): State<AppState>) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.delete_all_proxies();
    Json(StatusResponse::new(success))
}
