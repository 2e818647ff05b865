//! Menu-selectable commands.
//!
//! Each variant names an actuator operation the controller knows how to
//! perform.  Keeping these as data instead of stored closures lets the menu
//! stay `Copy` and lets tests assert on the selected command directly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AlarmDisarm,
    AlarmArmGlobal,
    AlarmArmLocal,
    BuzzerPlay,
    BuzzerStop,
    FanOnClockwise,
    FanOnCounterClockwise,
    FanOff,
    LedOn,
    LedOff,
    /// Shut everything down and deregister from the hub, then restart.
    Reset,
}
