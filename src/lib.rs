//! Droidprox - Proxy assignment manager for Android devices
//!
//! Assigns network proxy configurations to Android devices connected over
//! adb, tracks which proxy is bound to which device, and exposes
//! device/network telemetry to an interactive front end.
//!
//! ## Features
//!
//! - Durable proxy pool and proxy-to-device assignment map (JSON documents)
//! - One-proxy-per-device / one-device-per-proxy invariant enforcement
//! - Greedy bulk assignment across all online devices
//! - adb bridge adapter with executable discovery and bounded timeouts
//! - Host network counters and a rolling in-memory log buffer
//! - Local JSON API for the browser-based front end

pub mod api;
pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod registry;
pub mod telemetry;

pub use config::Config;
pub use coordinator::AssignmentCoordinator;
pub use error::{DroidProxError, Result};
pub use registry::ProxyRegistry;
