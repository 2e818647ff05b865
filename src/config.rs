//! System configuration parameters.
//!
//! All tunable parameters for the Smart House controller.  Defaults match
//! the board's reference deployment; deployments override the network keys
//! at provisioning time.

use serde::{Deserialize, Serialize};

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Network ---
    /// Wi-Fi SSID (1-32 printable ASCII bytes).
    pub wifi_ssid: heapless::String<32>,
    /// Wi-Fi WPA2 passphrase (8-64 bytes, empty for open networks).
    pub wifi_pass: heapless::String<64>,
    /// Base URL of the IoT hub REST API (no trailing slash).
    pub api_endpoint: String,
    /// Wi-Fi association timeout (seconds).
    pub wifi_timeout_secs: u16,

    // --- Timing ---
    /// Period of the hub keepalive timer (milliseconds).
    pub update_interval_ms: u32,
    /// Cooperative event-loop tick (milliseconds).
    pub tick_interval_ms: u32,

    // --- Alarm ---
    /// Siren window when the motion sensor trips an armed alarm (ms).
    pub motion_trigger_window_ms: u32,
    /// Siren window when the hub remotely activates the alarm (ms).
    pub remote_trigger_window_ms: u32,

    // --- Buzzer ---
    /// PWM duty while a tone sounds (0-1023 at 10-bit resolution).
    pub buzzer_duty: u16,
    /// Delay before the first melody note after start (ms).
    pub melody_start_delay_ms: u32,

    // --- Fan ---
    /// PWM duty applied to the active H-bridge channel (0-1023).
    pub fan_duty: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut ssid = heapless::String::new();
        let _ = ssid.push_str("DefaultSmartHouseSSID");
        let mut pass = heapless::String::new();
        let _ = pass.push_str("DefaultSecretPassword");

        Self {
            wifi_ssid: ssid,
            wifi_pass: pass,
            api_endpoint: String::from("http://192.168.0.1"),
            wifi_timeout_secs: 10,

            update_interval_ms: 1000,
            tick_interval_ms: 100,

            motion_trigger_window_ms: 2000,
            remote_trigger_window_ms: 4000,

            buzzer_duty: 512,
            melody_start_delay_ms: 100,

            fan_duty: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(!c.wifi_ssid.is_empty());
        assert!(c.tick_interval_ms > 0);
        assert!(c.update_interval_ms >= c.tick_interval_ms);
        assert!(c.buzzer_duty > 0 && c.buzzer_duty <= 1023);
        assert!(c.fan_duty > 0 && c.fan_duty <= 1023);
        assert!(!c.api_endpoint.ends_with('/'));
    }

    #[test]
    fn trigger_windows_exceed_tick() {
        let c = SystemConfig::default();
        assert!(c.motion_trigger_window_ms > c.tick_interval_ms);
        assert!(c.remote_trigger_window_ms > c.motion_trigger_window_ms);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.wifi_ssid, c2.wifi_ssid);
        assert_eq!(c.api_endpoint, c2.api_endpoint);
        assert_eq!(c.motion_trigger_window_ms, c2.motion_trigger_window_ms);
        assert_eq!(c.buzzer_duty, c2.buzzer_duty);
    }
}
