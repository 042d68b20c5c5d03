//! Assignment handlers

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::AppState;
use crate::error::DroidProxError;
use crate::models::{AssignProxyRequest, StatusResponse, UnassignProxyRequest};

/// Current bindings enriched with live device models
pub async fn get_assignments(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = state.coordinator.lock().await;
    Json(coordinator.assignments_view().await)
}

/// Assign a single proxy to a device
pub async fn assign_proxy(
    State(state): State<AppState>,
    Json(req): Json<AssignProxyRequest>,
) -> Result<impl IntoResponse, DroidProxError> {
    if req.device_id.is_empty() {
        return Err(DroidProxError::InvalidRequest(
            "device_id is required".to_string(),
        ));
    }
    if req.proxy.is_empty() {
        return Err(DroidProxError::InvalidRequest(
            "proxy is required".to_string(),
        ));
    }

    let mut coordinator = state.coordinator.lock().await;
    let outcome = coordinator.assign_single_proxy(&req.device_id, &req.proxy).await;
    Ok(Json(outcome))
}

/// Release a single binding (strict: keeps it on a failed device clear)
pub async fn unassign_proxy(
    State(state): State<AppState>,
    Json(req): Json<UnassignProxyRequest>,
) -> Result<impl IntoResponse, DroidProxError> {
    if req.proxy.is_empty() {
        return Err(DroidProxError::InvalidRequest(
            "proxy is required".to_string(),
        ));
    }

    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.unassign_proxy(&req.proxy).await;
    Ok(Json(StatusResponse::new(success)))
}

/// Release every binding, best-effort on the device side
pub async fn unassign_all_proxies(State(state): State<AppState>) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let success = coordinator.unassign_all_proxies().await;
    Json(StatusResponse::new(success))
}

/// Greedily pair online devices with unassigned pool proxies
pub async fn bulk_assign(State(state): State<AppState>) -> impl IntoResponse {
    let mut coordinator = state.coordinator.lock().await;
    let outcome = coordinator.bulk_assign_proxies().await;
    Json(outcome)
}
