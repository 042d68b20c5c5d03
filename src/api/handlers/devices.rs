//! Device handlers

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::AppState;
use crate::models::StatusResponse;

/// List connected devices, discovered fresh from the bridge
pub async fn list_devices(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = state.coordinator.lock().await;
    Json(coordinator.connected_devices().await)
}

/// Clear the proxy setting on every online device and wipe all bindings
pub async fn clear_all_device_proxies(State(state): State<AppState>) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.delete_all_device_proxies().await;
    Json(StatusResponse::new(success))
}
