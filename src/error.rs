//! Unified error types for the Smart House firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform.  Hardware configuration
//! errors (`Init`) are fatal at startup; hub errors are transient and the
//! controller retries them naturally on the next tick.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::hub::HubError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A hub protocol call failed (transport, status, or malformed body).
    Hub(HubError),
    /// Wi-Fi association / credential failure.
    Connectivity(ConnectivityError),
    /// Peripheral initialisation failed.  Fatal — the controller does not
    /// proceed to the run loop.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hub(e) => write!(f, "hub: {e}"),
            Self::Connectivity(e) => write!(f, "wifi: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<HubError> for Error {
    fn from(e: HubError) -> Self {
        Self::Hub(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
