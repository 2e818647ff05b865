//! Application core: commands, ports and the controller service.

pub mod commands;
pub mod ports;
pub mod service;

pub use commands::MenuAction;
pub use ports::DisplayPort;
pub use service::Controller;
