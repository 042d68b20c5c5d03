//! Telemetry facade
//!
//! Read-only host network counters and the bounded in-memory log buffer
//! exposed to the front end.

pub mod logs;
pub mod net;

pub use logs::{BufferLayer, LogBuffer, DEFAULT_LOG_CAPACITY};
pub use net::network_stats;
