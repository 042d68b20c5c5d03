use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DroidProxError;

/// A parsed `host:port` proxy endpoint
///
/// The pool persists raw strings; parsing happens at validation and
/// assignment time. The `:0` disabling sentinel written to devices has an
/// empty host and therefore never parses as an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

impl FromStr for ProxyEndpoint {
    type Err = DroidProxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');

        let host = parts.next().unwrap_or_default();
        let port = parts.next();

        // Exactly one separator, non-empty host, valid u16 port
        if host.is_empty() || parts.next().is_some() {
            return Err(DroidProxError::InvalidProxyAddress(s.to_string()));
        }

        let port = port
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(|| DroidProxError::InvalidProxyAddress(s.to_string()))?;

        Ok(ProxyEndpoint {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Check whether a raw pool entry is a valid `host:port` string
pub fn is_valid_proxy(raw: &str) -> bool {
    raw.parse::<ProxyEndpoint>().is_ok()
}

/// One proxy or a sequence of proxies
///
/// The front end submits either shape; both normalize to a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProxyBatch {
    One(String),
    Many(Vec<String>),
}

impl ProxyBatch {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ProxyBatch::One(proxy) => vec![proxy],
            ProxyBatch::Many(proxies) => proxies,
        }
    }
}

/// Request to add proxies to the pool
#[derive(Debug, Clone, Deserialize)]
pub struct AddProxiesRequest {
    pub proxies: ProxyBatch,
}

/// Request to delete proxies from the pool
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProxiesRequest {
    pub proxies: Vec<String>,
}

/// Request to assign a single proxy to a device
#[derive(Debug, Clone, Deserialize)]
pub struct AssignProxyRequest {
    pub device_id: String,
    pub proxy: String,
}

/// Request to release a proxy binding
#[derive(Debug, Clone, Deserialize)]
pub struct UnassignProxyRequest {
    pub proxy: String,
}

/// Simple success flag returned by mutating pool operations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
}

impl StatusResponse {
    pub fn new(success: bool) -> Self {
        Self { success }
    }
}

/// Outcome of an assignment operation, carrying a user-facing message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignOutcome {
    pub success: bool,
    pub message: String,
}

impl AssignOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Assignment map entry enriched with live device information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub device_id: String,
    pub device_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_endpoint_parses_valid_addresses() {
        let endpoint: ProxyEndpoint = "1.2.3.4:8080".parse().unwrap();
        assert_eq!(endpoint.host, "1.2.3.4");
        assert_eq!(endpoint.port, 8080);
        assert_eq!(endpoint.to_string(), "1.2.3.4:8080");

        let endpoint: ProxyEndpoint = "proxy.example.com:3128".parse().unwrap();
        assert_eq!(endpoint.host, "proxy.example.com");
        assert_eq!(endpoint.port, 3128);
    }

    #[test]
    fn test_proxy_endpoint_rejects_malformed_addresses() {
        for raw in [
            "",
            "1.2.3.4",
            "1.2.3.4:",
            ":8080",
            ":0",
            "1.2.3.4:port",
            "1.2.3.4:8080:9090",
            "1.2.3.4:99999",
            "1.2.3.4:-1",
        ] {
            let result = raw.parse::<ProxyEndpoint>();
            assert!(
                matches!(result, Err(DroidProxError::InvalidProxyAddress(_))),
                "expected {:?} to be rejected",
                raw
            );
            assert!(!is_valid_proxy(raw));
        }
    }

    #[test]
    fn test_proxy_batch_accepts_single_and_sequence() {
        let batch: ProxyBatch = serde_json::from_str("\"1.2.3.4:8080\"").unwrap();
        assert_eq!(batch.into_vec(), vec!["1.2.3.4:8080".to_string()]);

        let batch: ProxyBatch =
            serde_json::from_str("[\"1.2.3.4:8080\", \"5.6.7.8:3128\"]").unwrap();
        assert_eq!(batch.into_vec().len(), 2);
    }

    #[test]
    fn test_assign_outcome_helpers() {
        let outcome = AssignOutcome::ok("proxy set");
        assert!(outcome.success);
        assert_eq!(outcome.message, "proxy set");

        let outcome = AssignOutcome::fail("proxy already in use");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "proxy already in use");
    }
}
