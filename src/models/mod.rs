pub mod device;
pub mod log;
pub mod proxy;
pub mod telemetry;

pub use device::*;
pub use log::*;
pub use proxy::*;
pub use telemetry::*;
