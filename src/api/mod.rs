//! API server implementation
//!
//! Exposes the coordinator, registry, and telemetry operations as a local
//! JSON-over-HTTP surface for the interactive front end.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use server::ApiServer;
