//! Wall LED driver (single digital output).

use log::info;

use crate::devices::Device;
use crate::drivers::hw_init;
use crate::events::{EventQueue, EventSource, StateSnapshot};
use crate::pins;

/// Plain value record of the LED's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedState {
    pub active: bool,
    pub timestamp: u64,
}

pub struct Led {
    state: LedState,
}

impl Led {
    pub fn new() -> Self {
        Self {
            state: LedState::default(),
        }
    }

    pub fn state(&self) -> &LedState {
        &self.state
    }

    /// No-op if already on.
    pub fn turn_on(&mut self, now_ms: u64, queue: &mut EventQueue) {
        if self.state.active {
            return;
        }
        info!("led: on");
        self.state.active = true;
        self.apply(now_ms, queue);
    }

    /// No-op if already off.
    pub fn turn_off(&mut self, now_ms: u64, queue: &mut EventQueue) {
        if !self.state.active {
            return;
        }
        info!("led: off");
        self.state.active = false;
        self.apply(now_ms, queue);
    }

    fn apply(&mut self, now_ms: u64, queue: &mut EventQueue) {
        self.state.timestamp = now_ms;
        hw_init::gpio_write(pins::LED_GPIO, self.state.active);
        self.push_state(queue);
    }
}

impl Device for Led {
    fn source(&self) -> EventSource {
        EventSource::Led
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Led(self.state)
    }

    fn finalize(&mut self) {
        hw_init::gpio_write(pins::LED_GPIO, false);
    }
}
