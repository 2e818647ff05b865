//! House identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable, human-readable house ID: the full 6-byte MAC in
//! uppercase hex (`A1B2C3D4E5F6`). This ID is:
//! - Deterministic across reboots (factory-burned eFuse MAC)
//! - The `unique_id` in every hub request
//! - Part of the hub resource path (`/houses/{id}/...`)

/// Fixed-size house ID string: 12 hex chars.
pub type HouseIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Derive the house ID from the full MAC, uppercase hex.
pub fn house_id(mac: &MacAddress) -> HouseIdString {
    let mut id = HouseIdString::new();
    use core::fmt::Write;
    for byte in mac {
        let _ = write!(id, "{:02X}", byte);
    }
    id
}
