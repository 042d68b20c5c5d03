//! CORS middleware configuration
//!
//! The API serves a browser-based front end on the same machine, so the
//! default allowlist covers local origins only.

use axum::http::header;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::debug;

/// Create a CORS layer with the specified allowed origins
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed_headers = [header::CONTENT_TYPE, header::ACCEPT];
    let allowed_methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if allowed_origins.is_empty() {
        debug!("CORS: No origins specified, allowing localhost only");
        CorsLayer::new()
            .allow_origin([
                "http://localhost:8700".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:8700".parse::<HeaderValue>().unwrap(),
            ])
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
    } else {
        debug!("CORS: Allowing origins: {:?}", allowed_origins);
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
    }
}
