//! Platform adapters: time, identity, connectivity, display, HTTP.

pub mod device_id;
pub mod display;
#[cfg(target_os = "espidf")]
pub mod http;
pub mod time;
pub mod wifi;
