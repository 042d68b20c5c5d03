//! API route definitions

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers;
use super::server::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        .route("/api/status", get(handlers::health::status))
        // Devices
        .route("/api/devices", get(handlers::devices::list_devices))
        .route(
            "/api/devices/proxies",
            delete(handlers::devices::clear_all_device_proxies),
        )
        // Proxy pool
        .route("/api/proxies", get(handlers::proxies::list_proxies))
        .route("/api/proxies", post(handlers::proxies::add_proxies))
        .route("/api/proxies", delete(handlers::proxies::delete_proxies))
        .route(
            "/api/proxies/all",
            delete(handlers::proxies::delete_all_proxies),
        )
        // Assignments
        .route(
            "/api/assignments",
            get(handlers::assignments::get_assignments),
        )
        .route("/api/assignments", post(handlers::assignments::assign_proxy))
        .route(
            "/api/assignments/unassign",
            post(handlers::assignments::unassign_proxy),
        )
        .route(
            "/api/assignments/bulk",
            post(handlers::assignments::bulk_assign),
        )
        .route(
            "/api/assignments/all",
            delete(handlers::assignments::unassign_all_proxies),
        )
        // Telemetry
        .route("/api/stats/network", get(handlers::telemetry::network_stats))
        .route("/api/logs", get(handlers::telemetry::recent_logs))
        .route("/api/logs", delete(handlers::telemetry::clear_logs))
        .with_state(state)
}
