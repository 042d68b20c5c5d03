use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unified error type for the droidprox application
#[derive(Error, Debug)]
pub enum DroidProxError {
    // Persistence errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Proxy errors
    #[error("Invalid proxy address: {0} (use host:port)")]
    InvalidProxyAddress(String),

    #[error("Proxy already in use: {proxy}")]
    ProxyInUse { proxy: String },

    #[error("No proxies available")]
    NoProxiesAvailable,

    // Device errors
    #[error("No devices available")]
    NoDevicesAvailable,

    #[error("Device command failed for {device_id}")]
    DeviceCommandFailed { device_id: String },

    // Bridge errors
    #[error("Bridge executable not found")]
    BridgeUnavailable,

    #[error("Bridge command failed: {0}")]
    BridgeCommand(String),

    #[error("Bridge command timed out")]
    BridgeTimeout,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for droidprox operations
pub type Result<T> = std::result::Result<T, DroidProxError>;

impl DroidProxError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            DroidProxError::InvalidRequest(_)
            | DroidProxError::InvalidProxyAddress(_)
            | DroidProxError::InvalidConfig(_) => StatusCode::BAD_REQUEST,

            // 409 Conflict
            DroidProxError::ProxyInUse { .. } => StatusCode::CONFLICT,

            // 502 Bad Gateway
            DroidProxError::DeviceCommandFailed { .. } | DroidProxError::BridgeCommand(_) => {
                StatusCode::BAD_GATEWAY
            }

            // 503 Service Unavailable
            DroidProxError::NoProxiesAvailable
            | DroidProxError::NoDevicesAvailable
            | DroidProxError::BridgeUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 504 Gateway Timeout
            DroidProxError::BridgeTimeout => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            DroidProxError::Io(_) | DroidProxError::Json(_) | DroidProxError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// Implement IntoResponse for API error responses
impl IntoResponse for DroidProxError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_code_mapping() {
        assert_eq!(
            DroidProxError::InvalidRequest("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DroidProxError::InvalidProxyAddress("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DroidProxError::ProxyInUse {
                proxy: "1.2.3.4:8080".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DroidProxError::BridgeUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            DroidProxError::BridgeTimeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            DroidProxError::DeviceCommandFailed {
                device_id: "emulator-5554".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_client_server_helpers() {
        assert!(DroidProxError::InvalidRequest("bad".to_string()).is_client_error());
        assert!(!DroidProxError::InvalidRequest("bad".to_string()).is_server_error());

        assert!(DroidProxError::NoDevicesAvailable.is_server_error());
        assert!(!DroidProxError::NoDevicesAvailable.is_client_error());
    }
}
