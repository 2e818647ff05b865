//! PIR motion sensor (edge-triggered, interrupt-driven).
//!
//! The GPIO ISR runs in interrupt context and must not touch the event
//! queue or allocate: it only latches the observed level and an
//! edge-pending flag into atomics.  `poll()` — called from the main loop —
//! applies the latched edge to the owned state record and performs the
//! deferred queue push at the next safe scheduling point.

use core::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::devices::Device;
use crate::events::{EventQueue, EventSource, StateSnapshot};

/// Edge latched by the ISR, not yet consumed by the main loop.
static MOTION_EDGE_PENDING: AtomicBool = AtomicBool::new(false);
/// Pin level at the latched edge: true = rising (motion detected).
static MOTION_LEVEL_HIGH: AtomicBool = AtomicBool::new(false);

/// ISR handler — register on both edges of the PIR output.
/// Safe to call from interrupt context (lock-free atomic stores).
pub fn motion_isr_handler(level_high: bool) {
    MOTION_LEVEL_HIGH.store(level_high, Ordering::Release);
    MOTION_EDGE_PENDING.store(true, Ordering::Release);
}

/// Plain value record of the sensor's observable state.  Exactly one of
/// the two timestamps is non-zero after the first edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionState {
    pub motion_detected: bool,
    pub triggered_timestamp: u64,
    pub released_timestamp: u64,
}

pub struct Motion {
    state: MotionState,
}

impl Motion {
    pub fn new() -> Self {
        Self {
            state: MotionState::default(),
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Consume a latched ISR edge, update the record and publish the
    /// deferred state event.  Called every loop tick.
    pub fn poll(&mut self, now_ms: u64, queue: &mut EventQueue) {
        if !MOTION_EDGE_PENDING.swap(false, Ordering::AcqRel) {
            return;
        }

        if MOTION_LEVEL_HIGH.load(Ordering::Acquire) {
            info!("motion: detected");
            self.state.motion_detected = true;
            self.state.triggered_timestamp = now_ms;
            self.state.released_timestamp = 0;
        } else {
            info!("motion: released");
            self.state.motion_detected = false;
            self.state.triggered_timestamp = 0;
            self.state.released_timestamp = now_ms;
        }

        self.push_state(queue);
    }
}

impl Device for Motion {
    fn source(&self) -> EventSource {
        EventSource::Motion
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Motion(self.state)
    }

    fn finalize(&mut self) {
        MOTION_EDGE_PENDING.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Serializes tests that poke the process-wide ISR latch.
    static ISR_LOCK: Mutex<()> = Mutex::new(());

    fn reset_isr() -> MutexGuard<'static, ()> {
        let guard = ISR_LOCK.lock().unwrap();
        MOTION_EDGE_PENDING.store(false, Ordering::SeqCst);
        MOTION_LEVEL_HIGH.store(false, Ordering::SeqCst);
        guard
    }

    #[test]
    fn no_event_without_edge() {
        let _g = reset_isr();
        let mut m = Motion::new();
        let mut q = EventQueue::new();
        m.poll(100, &mut q);
        assert!(q.is_empty());
    }

    #[test]
    fn rising_edge_sets_trigger_timestamp_only() {
        let _g = reset_isr();
        let mut m = Motion::new();
        let mut q = EventQueue::new();

        motion_isr_handler(true);
        m.poll(500, &mut q);

        assert!(m.state().motion_detected);
        assert_eq!(m.state().triggered_timestamp, 500);
        assert_eq!(m.state().released_timestamp, 0);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop().unwrap().source, EventSource::Motion);
    }

    #[test]
    fn falling_edge_swaps_timestamps() {
        let _g = reset_isr();
        let mut m = Motion::new();
        let mut q = EventQueue::new();

        motion_isr_handler(true);
        m.poll(500, &mut q);
        motion_isr_handler(false);
        m.poll(900, &mut q);

        assert!(!m.state().motion_detected);
        assert_eq!(m.state().triggered_timestamp, 0);
        assert_eq!(m.state().released_timestamp, 900);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn edge_consumed_once() {
        let _g = reset_isr();
        let mut m = Motion::new();
        let mut q = EventQueue::new();

        motion_isr_handler(true);
        m.poll(100, &mut q);
        m.poll(200, &mut q);
        assert_eq!(q.len(), 1, "one edge yields exactly one deferred event");
    }
}
