//! ISR-debounced push buttons.
//!
//! Active-low momentary switches with internal pull-ups; the GPIO ISR
//! fires on the falling edge and records the raw press timestamp into a
//! per-button atomic.  `poll()` (main loop) debounces and publishes a
//! `pressed` state event through the queue — the ISR itself never touches
//! the queue.

use core::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::devices::Device;
use crate::events::{EventQueue, EventSource, StateSnapshot};

const DEBOUNCE_MS: u32 = 50;

/// Raw ISR press timestamps (ms since boot, truncated to u32), indexed by
/// [`ButtonId`].  Written by the ISR, read by the main loop.
static BUTTON_ISR_TIMESTAMP: [AtomicU32; 2] = [AtomicU32::new(0), AtomicU32::new(0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ButtonId {
    A = 0,
    B = 1,
}

/// ISR handler — register on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr_handler(id: ButtonId, now_ms: u32) {
    BUTTON_ISR_TIMESTAMP[id as usize].store(now_ms, Ordering::Release);
}

/// Plain value record of a button's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub pressed: bool,
    pub timestamp: u64,
}

pub struct Button {
    id: ButtonId,
    state: ButtonState,
    /// Timestamp of the last press accepted by the debounce filter.
    last_accepted_ms: u32,
}

impl Button {
    pub fn new(id: ButtonId) -> Self {
        Self {
            id,
            state: ButtonState::default(),
            last_accepted_ms: 0,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    /// Consume a latched ISR press, debounce and publish the state event.
    /// Called every loop tick.
    pub fn poll(&mut self, now_ms: u64, queue: &mut EventQueue) {
        let isr_ms = BUTTON_ISR_TIMESTAMP[self.id as usize].load(Ordering::Acquire);
        if isr_ms == 0 || isr_ms == self.last_accepted_ms {
            return;
        }
        if isr_ms.wrapping_sub(self.last_accepted_ms) < DEBOUNCE_MS {
            // Contact bounce — absorb without emitting.
            self.last_accepted_ms = isr_ms;
            debug!("button {:?}: bounce filtered", self.id);
            return;
        }

        self.last_accepted_ms = isr_ms;
        self.state.pressed = true;
        self.state.timestamp = now_ms;
        self.push_state(queue);
    }
}

impl Device for Button {
    fn source(&self) -> EventSource {
        match self.id {
            ButtonId::A => EventSource::ButtonA,
            ButtonId::B => EventSource::ButtonB,
        }
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Button(self.state)
    }

    fn finalize(&mut self) {
        BUTTON_ISR_TIMESTAMP[self.id as usize].store(0, Ordering::Release);
    }
}
