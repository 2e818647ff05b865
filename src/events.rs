//! Device event queue.
//!
//! Every peripheral that changes observable state pushes a snapshot of that
//! state, tagged with its identity, into one bounded FIFO.  The main loop is
//! the single consumer and drains at most one event per tick.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Buttons      │────▶│              │     │              │
//! │ Motion (ISR*)│────▶│  EventQueue  │────▶│  Controller  │
//! │ Alarm timer  │────▶│  (cap = 10)  │     │  (consumer)  │
//! │ Actuators    │────▶│              │     │              │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! *ISR handlers never touch the queue directly: they latch per-device
//! atomics and the main loop converts those into pushes at the next tick
//! (see `devices::motion` / `devices::button`).  The queue itself is a
//! plain value owned by the controller — no process-wide singleton.
//!
//! Overflow policy: the oldest event is evicted to admit the newest.  The
//! consumer treats events as independent notifications, not as a log of
//! truth, so losing the oldest is safe — current device state is
//! authoritative.

use heapless::Deque;

use crate::devices::alarm::AlarmState;
use crate::devices::button::ButtonState;
use crate::devices::buzzer::BuzzerState;
use crate::devices::fan::FanState;
use crate::devices::led::LedState;
use crate::devices::motion::MotionState;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 10;

/// Identity of the device an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    ButtonA,
    ButtonB,
    Motion,
    Alarm,
    Buzzer,
    Fan,
    Led,
}

impl EventSource {
    /// Path-like identifier, mirrored by the hub dashboard.
    pub fn path(self) -> &'static str {
        match self {
            Self::ButtonA => "/in/button_a",
            Self::ButtonB => "/in/button_b",
            Self::Motion => "/in/motion",
            Self::Alarm => "/dev/alarm",
            Self::Buzzer => "/out/buzzer",
            Self::Fan => "/dev/fan",
            Self::Led => "/out/led",
        }
    }
}

/// Semantic state snapshot carried by an event.  Plain `Copy` records —
/// immutable once enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSnapshot {
    Button(ButtonState),
    Motion(MotionState),
    Alarm(AlarmState),
    Buzzer(BuzzerState),
    Fan(FanState),
    Led(LedState),
}

/// A device state change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEvent {
    pub source: EventSource,
    pub state: StateSnapshot,
}

/// Bounded FIFO of device events.  Single consumer; producers run from the
/// main loop only (ISR work is deferred, see module docs).  `push` never
/// blocks and never allocates.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Deque<DeviceEvent, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            inner: Deque::new(),
            dropped: 0,
        }
    }

    /// Enqueue an event, evicting the oldest entry if the queue is full.
    pub fn push(&mut self, event: DeviceEvent) {
        if self.inner.is_full() {
            let _ = self.inner.pop_front();
            self.dropped = self.dropped.wrapping_add(1);
        }
        // Cannot fail: a slot was just freed if the queue was full.
        let _ = self.inner.push_back(event);
    }

    /// Dequeue the oldest event, or `None` if empty.
    pub fn pop(&mut self) -> Option<DeviceEvent> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        EVENT_QUEUE_CAP
    }

    /// Total events evicted by the overflow policy since startup.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::led::LedState;

    fn led_event(n: u64) -> DeviceEvent {
        DeviceEvent {
            source: EventSource::Led,
            state: StateSnapshot::Led(LedState {
                active: true,
                timestamp: n,
            }),
        }
    }

    #[test]
    fn fifo_order_preserved() {
        let mut q = EventQueue::new();
        for n in 0..3 {
            q.push(led_event(n));
        }
        for n in 0..3 {
            let ev = q.pop().unwrap();
            assert_eq!(ev.state, StateSnapshot::Led(LedState { active: true, timestamp: n }));
        }
        assert!(q.pop().is_none());
    }

    #[test]
    fn overflow_evicts_oldest_keeps_newest() {
        let mut q = EventQueue::new();
        for n in 0..(EVENT_QUEUE_CAP as u64 + 5) {
            q.push(led_event(n));
            assert!(q.len() <= EVENT_QUEUE_CAP);
        }
        assert_eq!(q.len(), EVENT_QUEUE_CAP);
        assert_eq!(q.dropped(), 5);

        // The 5 oldest were evicted; the survivors start at 5.
        let first = q.pop().unwrap();
        assert_eq!(
            first.state,
            StateSnapshot::Led(LedState { active: true, timestamp: 5 })
        );

        // The newest is still present at the tail.
        let mut last = first;
        while let Some(ev) = q.pop() {
            last = ev;
        }
        assert_eq!(
            last.state,
            StateSnapshot::Led(LedState { active: true, timestamp: EVENT_QUEUE_CAP as u64 + 4 })
        );
    }

    #[test]
    fn source_paths_are_stable() {
        assert_eq!(EventSource::ButtonA.path(), "/in/button_a");
        assert_eq!(EventSource::Motion.path(), "/in/motion");
        assert_eq!(EventSource::Alarm.path(), "/dev/alarm");
    }
}
