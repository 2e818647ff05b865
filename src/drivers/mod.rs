//! Hardware initialisation and peripheral helpers.

pub mod hw_init;
pub mod hw_timer;
