//! Dual-direction fan driver (H-bridge over two LEDC PWM channels).
//!
//! Channel A spins the fan clockwise, channel B counter-clockwise.  At most
//! one channel carries a non-zero duty at any time.  `turn_on`/`turn_off`
//! are guarded: re-issuing the current command is a no-op, so a naively
//! repeated remote directive causes neither redundant hardware writes nor
//! event floods.

use log::info;

use crate::devices::Device;
use crate::drivers::hw_init;
use crate::events::{EventQueue, EventSource, StateSnapshot};
use crate::pins;

/// Plain value record of the fan's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanState {
    pub active: bool,
    pub clockwise: bool,
    pub timestamp: u64,
}

impl Default for FanState {
    fn default() -> Self {
        Self {
            active: false,
            clockwise: true,
            timestamp: 0,
        }
    }
}

pub struct Fan {
    state: FanState,
    duty: u16,
    /// Mirrors of the last duty written to each channel.
    duty_a: u16,
    duty_b: u16,
}

impl Fan {
    pub fn new(duty: u16) -> Self {
        Self {
            state: FanState::default(),
            duty,
            duty_a: 0,
            duty_b: 0,
        }
    }

    pub fn state(&self) -> &FanState {
        &self.state
    }

    /// (channel A, channel B) duties last written to hardware.
    pub fn channel_duties(&self) -> (u16, u16) {
        (self.duty_a, self.duty_b)
    }

    /// Start the fan in a specific direction.  No-op if already active.
    pub fn turn_on(&mut self, clockwise: bool, now_ms: u64, queue: &mut EventQueue) {
        if self.state.active {
            return;
        }
        info!(
            "fan: on ({})",
            if clockwise { "clockwise" } else { "counter-clockwise" }
        );
        self.state.active = true;
        self.state.clockwise = clockwise;
        self.apply(now_ms, queue);
    }

    /// Stop the fan.  No-op if already inactive.
    pub fn turn_off(&mut self, now_ms: u64, queue: &mut EventQueue) {
        if !self.state.active {
            return;
        }
        info!("fan: off");
        self.state.active = false;
        self.apply(now_ms, queue);
    }

    /// Synchronize hardware with the state record and publish the change.
    fn apply(&mut self, now_ms: u64, queue: &mut EventQueue) {
        self.state.timestamp = now_ms;

        let (a, b) = if self.state.active && self.state.clockwise {
            (self.duty, 0)
        } else if self.state.active {
            (0, self.duty)
        } else {
            (0, 0)
        };

        hw_init::ledc_set_duty(pins::LEDC_CH_FAN_A, a);
        hw_init::ledc_set_duty(pins::LEDC_CH_FAN_B, b);
        self.duty_a = a;
        self.duty_b = b;

        self.push_state(queue);
    }
}

impl Device for Fan {
    fn source(&self) -> EventSource {
        EventSource::Fan
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Fan(self.state)
    }

    fn finalize(&mut self) {
        hw_init::ledc_set_duty(pins::LEDC_CH_FAN_A, 0);
        hw_init::ledc_set_duty(pins::LEDC_CH_FAN_B, 0);
        self.duty_a = 0;
        self.duty_b = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clockwise_drives_channel_a_only() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        fan.turn_on(true, 10, &mut q);
        assert_eq!(fan.channel_duties(), (512, 0));
        assert!(fan.state().active);
        assert!(fan.state().clockwise);
    }

    #[test]
    fn counter_clockwise_drives_channel_b_only() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        fan.turn_on(false, 10, &mut q);
        assert_eq!(fan.channel_duties(), (0, 512));
    }

    #[test]
    fn at_most_one_channel_nonzero() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        for (cw, off) in [(true, false), (false, true), (true, true)] {
            fan.turn_on(cw, 0, &mut q);
            let (a, b) = fan.channel_duties();
            assert!(a == 0 || b == 0);
            if off {
                fan.turn_off(0, &mut q);
                assert_eq!(fan.channel_duties(), (0, 0));
            }
        }
    }

    #[test]
    fn turn_on_is_idempotent() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        fan.turn_on(true, 10, &mut q);
        assert_eq!(q.len(), 1);

        // Second identical command: no event, no state change.
        fan.turn_on(true, 20, &mut q);
        assert_eq!(q.len(), 1, "repeated turn_on must not emit");
        assert_eq!(fan.state().timestamp, 10);

        // Direction change while running is also ignored (must stop first).
        fan.turn_on(false, 30, &mut q);
        assert!(fan.state().clockwise);
    }

    #[test]
    fn turn_off_is_idempotent() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        fan.turn_off(10, &mut q);
        assert_eq!(q.len(), 0, "off while off must not emit");

        fan.turn_on(true, 20, &mut q);
        fan.turn_off(30, &mut q);
        assert_eq!(q.len(), 2);
        assert_eq!(fan.channel_duties(), (0, 0));
    }

    #[test]
    fn state_events_tagged_with_fan_source() {
        let mut fan = Fan::new(512);
        let mut q = EventQueue::new();
        fan.turn_on(true, 5, &mut q);
        let ev = q.pop().unwrap();
        assert_eq!(ev.source, EventSource::Fan);
        assert_eq!(
            ev.state,
            StateSnapshot::Fan(FanState {
                active: true,
                clockwise: true,
                timestamp: 5
            })
        );
    }
}
