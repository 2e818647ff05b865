//! JSON bodies exchanged with the hub.
//!
//! Wire structs are kept separate from the in-memory device states so the
//! serialized shape can stay stable while the devices evolve.  Alarm mode
//! travels as a raw `u8`.

use serde::{Deserialize, Serialize};

use crate::devices::alarm::{AlarmMode, AlarmState};
use crate::devices::buzzer::BuzzerState;
use crate::devices::fan::FanState;
use crate::devices::led::LedState;
use crate::devices::motion::MotionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmWire {
    pub triggered: bool,
    pub armed: bool,
    pub mode: u8,
    pub armed_timestamp: u64,
    pub triggered_timestamp: u64,
    pub disarmed_timestamp: u64,
}

impl From<AlarmState> for AlarmWire {
    fn from(s: AlarmState) -> Self {
        Self {
            triggered: s.triggered,
            armed: s.armed,
            mode: s.mode.to_wire(),
            armed_timestamp: s.armed_timestamp,
            triggered_timestamp: s.triggered_timestamp,
            disarmed_timestamp: s.disarmed_timestamp,
        }
    }
}

impl AlarmWire {
    pub fn mode_enum(&self) -> AlarmMode {
        AlarmMode::from_wire(self.mode).unwrap_or(AlarmMode::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzerWire {
    pub active: bool,
    pub timestamp: u64,
}

impl From<BuzzerState> for BuzzerWire {
    fn from(s: BuzzerState) -> Self {
        Self {
            active: s.active,
            timestamp: s.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanWire {
    pub active: bool,
    pub clockwise: bool,
    pub timestamp: u64,
}

impl From<FanState> for FanWire {
    fn from(s: FanState) -> Self {
        Self {
            active: s.active,
            clockwise: s.clockwise,
            timestamp: s.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedWire {
    pub active: bool,
    pub timestamp: u64,
}

impl From<LedState> for LedWire {
    fn from(s: LedState) -> Self {
        Self {
            active: s.active,
            timestamp: s.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionWire {
    pub motion_detected: bool,
    pub triggered_timestamp: u64,
    pub released_timestamp: u64,
}

impl From<MotionState> for MotionWire {
    fn from(s: MotionState) -> Self {
        Self {
            motion_detected: s.motion_detected,
            triggered_timestamp: s.triggered_timestamp,
            released_timestamp: s.released_timestamp,
        }
    }
}

/// Full house snapshot as pushed to and pulled from the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseStateWire {
    pub alarm: AlarmWire,
    pub buzzer: BuzzerWire,
    pub fan: FanWire,
    pub led: LedWire,
    pub motion: MotionWire,
    pub wall_msg: String,
}

/// Body for `POST /houses` and for keepalives.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody<'a> {
    pub unique_id: &'a str,
    pub ip_address: &'a str,
    pub state: &'a HouseStateWire,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeepaliveBody<'a> {
    pub unique_id: &'a str,
    pub ip_address: &'a str,
}
