//! Peripheral device state machines.
//!
//! Each device owns a plain state record mutated only by its own methods,
//! and publishes snapshots to the shared [`EventQueue`](crate::events::EventQueue)
//! on observable change.  Hardware access goes through the cfg-gated free
//! functions in [`crate::drivers::hw_init`], so every module here is fully
//! testable on the host.
//!
//! Interrupt-context rules: GPIO ISRs (buttons, motion) only latch atomics;
//! each device's `poll()` — called from the main loop — applies the latched
//! edge to the owned record and performs the deferred queue push.

pub mod alarm;
pub mod button;
pub mod buzzer;
pub mod fan;
pub mod led;
pub mod motion;

use crate::events::{DeviceEvent, EventQueue, EventSource, StateSnapshot};

/// Common device lifecycle + "push current state as event" primitive.
pub trait Device {
    /// Stable identity used to tag emitted events.
    fn source(&self) -> EventSource;

    /// Current state as an immutable snapshot.
    fn snapshot(&self) -> StateSnapshot;

    /// Publish the current state to the event queue.
    fn push_state(&self, queue: &mut EventQueue) {
        queue.push(DeviceEvent {
            source: self.source(),
            state: self.snapshot(),
        });
    }

    /// Release hardware and disarm any pending timers.  Idempotent.
    fn finalize(&mut self);
}
