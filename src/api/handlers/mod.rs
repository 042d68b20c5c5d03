//! API request handlers

pub mod assignments;
pub mod devices;
pub mod health;
pub mod proxies;
pub mod telemetry;
