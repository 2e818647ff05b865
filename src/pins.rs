//! GPIO / peripheral pin assignments for the Smart House main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Menu-navigate button (active-low, internal pull-up).
pub const BUTTON_A_GPIO: i32 = 26;
/// Menu-select button (active-low, internal pull-up).
pub const BUTTON_B_GPIO: i32 = 25;

/// PIR motion sensor — digital output, interrupt on both edges.
pub const MOTION_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Wall LED (digital output, active HIGH).
pub const LED_GPIO: i32 = 12;

/// Fan H-bridge input A — LEDC PWM, drives clockwise rotation.
pub const FAN_A_GPIO: i32 = 18;
/// Fan H-bridge input B — LEDC PWM, drives counter-clockwise rotation.
pub const FAN_B_GPIO: i32 = 19;

/// Piezo buzzer — LEDC PWM, frequency = tone, duty = volume.
pub const BUZZER_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I²C bus (16x2 character LCD behind a PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
pub const I2C_FREQ_HZ: u32 = 400_000;
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// LEDC channel allocation
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 10;

pub const LEDC_CH_BUZZER: u32 = 0;
pub const LEDC_CH_FAN_A: u32 = 1;
pub const LEDC_CH_FAN_B: u32 = 2;

/// LEDC base frequency for the fan H-bridge.
pub const FAN_PWM_FREQ_HZ: u32 = 1_000;
/// Initial buzzer LEDC frequency (retuned per note at runtime).
pub const BUZZER_PWM_FREQ_HZ: u32 = 2_000;
