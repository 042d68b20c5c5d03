//! Telemetry handlers

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::server::AppState;
use crate::models::StatusResponse;
use crate::telemetry;

/// Host-wide network counters; null when unreadable
pub async fn network_stats() -> impl IntoResponse {
    Json(telemetry::network_stats())
}

/// Chronological snapshot of the log ring buffer
pub async fn recent_logs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.log_buffer.snapshot())
}

/// Empty the log ring buffer
pub async fn clear_logs(State(state): State<AppState>) -> impl IntoResponse {
    state.log_buffer.clear();
    Json(StatusResponse::new(true))
}
