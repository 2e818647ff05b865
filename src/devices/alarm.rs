//! Alarm state machine.
//!
//! Modes:
//! - `Local`  — siren only, never reported to the hub.
//! - `Global` — trigger is reported so the hub can fan out to other houses,
//!   then the mode demotes to `Local` so one trigger reports once.
//! - `Sensor` — silent monitoring; trigger state changes are recorded,
//!   reported and synced but no siren starts.
//!
//! `set_trigger` with a non-zero window arms a one-shot deadline that
//! auto-inverts the trigger when it elapses — a motion pulse becomes a
//! timed siren window without the caller managing timing.  The deadline is
//! serviced by `poll()` from the main loop; `disarm()` and `finalize()`
//! cancel it so no stale toggle fires later.

use log::info;

use crate::devices::Device;
use crate::events::{EventQueue, EventSource, StateSnapshot};

/// Alarm operating mode.  Wire values match the hub protocol (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlarmMode {
    #[default]
    None = 0,
    Local = 1,
    Global = 2,
    Sensor = 3,
}

impl AlarmMode {
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Local),
            2 => Some(Self::Global),
            3 => Some(Self::Sensor),
            _ => None,
        }
    }

    pub fn to_wire(self) -> u8 {
        self as u8
    }
}

/// Plain value record of the alarm's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmState {
    pub triggered: bool,
    pub armed: bool,
    pub mode: AlarmMode,
    pub armed_timestamp: u64,
    pub triggered_timestamp: u64,
    pub disarmed_timestamp: u64,
}

pub struct Alarm {
    state: AlarmState,
    /// Monotonic deadline (ms) at which the trigger auto-inverts.
    toggle_deadline_ms: Option<u64>,
}

impl Alarm {
    pub fn new() -> Self {
        Self {
            state: AlarmState::default(),
            toggle_deadline_ms: None,
        }
    }

    pub fn state(&self) -> &AlarmState {
        &self.state
    }

    /// Arm the alarm in a specific mode.
    pub fn arm(&mut self, mode: AlarmMode, now_ms: u64) {
        info!("alarm: armed in mode {:?}", mode);
        self.state.armed = true;
        self.state.mode = mode;
        self.state.armed_timestamp = now_ms;
    }

    /// Change the operating mode without touching the armed or trigger
    /// flags.  A reported trigger is demoted to `Local` through this so one
    /// trigger fans out to the hub at most once.
    pub fn set_mode(&mut self, mode: AlarmMode) {
        self.state.mode = mode;
    }

    /// Disarm from any state; clears the trigger and cancels a pending
    /// auto-untrigger window.
    pub fn disarm(&mut self, now_ms: u64) {
        info!("alarm: disarmed");
        self.state.armed = false;
        self.state.triggered = false;
        self.state.disarmed_timestamp = now_ms;
        self.toggle_deadline_ms = None;
    }

    /// Set the trigger flag.  A non-zero `window_ms` arms a one-shot
    /// deadline that inverts the trigger again after the window elapses.
    /// Every call publishes a state event.
    pub fn set_trigger(
        &mut self,
        triggered: bool,
        window_ms: u64,
        now_ms: u64,
        queue: &mut EventQueue,
    ) {
        if window_ms != 0 {
            info!(
                "alarm: {} for {} ms",
                if triggered { "triggered" } else { "untriggered" },
                window_ms
            );
        } else {
            info!(
                "alarm: {}",
                if triggered { "triggered" } else { "untriggered" }
            );
        }

        self.state.triggered = triggered;
        self.state.triggered_timestamp = now_ms;

        self.toggle_deadline_ms = if window_ms != 0 {
            Some(now_ms + window_ms)
        } else {
            None
        };

        self.push_state(queue);
    }

    /// Service the auto-untrigger deadline.  Called every loop tick.
    pub fn poll(&mut self, now_ms: u64, queue: &mut EventQueue) {
        if let Some(deadline) = self.toggle_deadline_ms {
            if now_ms >= deadline {
                self.toggle_deadline_ms = None;
                let inverted = !self.state.triggered;
                self.set_trigger(inverted, 0, now_ms, queue);
            }
        }
    }

    /// Whether an auto-untrigger window is currently pending.
    pub fn window_pending(&self) -> bool {
        self.toggle_deadline_ms.is_some()
    }
}

impl Device for Alarm {
    fn source(&self) -> EventSource {
        EventSource::Alarm
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Alarm(self.state)
    }

    fn finalize(&mut self) {
        self.toggle_deadline_ms = None;
    }
}
