//! Smart House Firmware — Main Entry Point
//!
//! Event-driven controller with a cooperative 100 ms loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  WifiAdapter     EspHttpTransport   Lcd1602Display           │
//! │  (Connectivity)  (HubClient I/O)    (DisplayPort)            │
//! │  Esp32Time       device_id                                   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            Controller (pure logic)                   │    │
//! │  │  EventQueue · Devices · Menu · Hub flags             │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use smarthouse::adapters::device_id;
use smarthouse::adapters::time::Esp32TimeAdapter;
use smarthouse::adapters::wifi::{ConnectivityPort, WifiAdapter};
use smarthouse::app::{Controller, DisplayPort};
use smarthouse::config::SystemConfig;
use smarthouse::drivers::{hw_init, hw_timer};
use smarthouse::hub::{HttpTransport, HubClient};

#[cfg(not(target_os = "espidf"))]
use smarthouse::hub::{HttpMethod, HttpResponse, TransportError};

/// Host simulation transport: every request succeeds with an empty body.
#[cfg(not(target_os = "espidf"))]
struct SimTransport;

#[cfg(not(target_os = "espidf"))]
impl HttpTransport for SimTransport {
    fn request(
        &mut self,
        method: HttpMethod,
        url: &str,
        _body: Option<&str>,
    ) -> std::result::Result<HttpResponse, TransportError> {
        log::debug!("http(sim): {} {}", method.as_str(), url);
        Ok(HttpResponse {
            status: 200,
            body: String::new(),
        })
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Smart House v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {} — continuing without ISRs", e);
    }

    let config = SystemConfig::default();
    let clock = Esp32TimeAdapter::new();

    // ── 3. WiFi station ───────────────────────────────────────
    let mut wifi = WifiAdapter::new();

    #[cfg(target_os = "espidf")]
    {
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let driver = BlockingWifi::wrap(
            EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
            sysloop,
        )?;
        wifi.attach(driver);

        // I2C display on the shared bus.
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::units::FromValueType;
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21,
            peripherals.pins.gpio22,
            &I2cConfig::new().baudrate(100u32.kHz().into()),
        )?;
        let display = smarthouse::adapters::display::Lcd1602Display::new(i2c);
        let transport = espidf_transport(&config)?;
        bootstrap(config, clock, wifi, display, transport)
    }

    #[cfg(not(target_os = "espidf"))]
    {
        let display = smarthouse::adapters::display::LogDisplay;
        bootstrap(config, clock, wifi, display, SimTransport)
    }
}

#[cfg(target_os = "espidf")]
fn espidf_transport(
    config: &SystemConfig,
) -> Result<smarthouse::adapters::http::EspHttpTransport> {
    use smarthouse::error::Error;
    smarthouse::adapters::http::EspHttpTransport::new(
        u32::from(config.wifi_timeout_secs) * 1_000,
    )
    .map_err(|_| Error::Init("http transport init failed").into())
}

/// Connect, register and run the controller loop until a reset is
/// requested.  Shared between hardware and host-simulation targets.
fn bootstrap<D: DisplayPort, T: HttpTransport>(
    config: SystemConfig,
    clock: Esp32TimeAdapter,
    mut wifi: WifiAdapter,
    mut display: D,
    transport: T,
) -> Result<()> {
    wifi.set_credentials(config.wifi_ssid.as_str(), config.wifi_pass.as_str())
        .map_err(smarthouse::error::Error::Connectivity)?;
    if let Err(e) = wifi.connect() {
        // No network means no hub; the house is headless without it.
        error!("WiFi connect failed ({e}); giving up");
        display.write_line(1, "WIFI FAILED");
        std::process::exit(1);
    }
    let ip = wifi
        .ip_address()
        .ok_or(smarthouse::error::Error::Init("no station IP after connect"))?;

    // ── 4. Hub registration ───────────────────────────────────
    let mac = device_id::read_mac();
    let house_id = device_id::house_id(&mac);
    info!("House ID: {} (ip: {})", house_id, ip);

    let mut hub = HubClient::new(
        transport,
        &config.api_endpoint,
        house_id.as_str(),
        &ip.to_string(),
    );

    let mut controller = Controller::new(config.clone());
    controller.refresh_display(&mut display);

    if let Err(e) = hub.register(&controller.house_state()) {
        // Keepalives re-announce us; the hub tolerates a late register.
        warn!("hub register failed: {e}");
        display.write_line(1, "HUB OFFLINE");
    }

    hw_timer::start_keepalive_timer(config.update_interval_ms);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    let mut sim_elapsed_ms: u32 = 0;

    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.tick_interval_ms,
        )));

        // Simulate the keepalive timer on hosts without esp_timer.
        #[cfg(not(target_os = "espidf"))]
        {
            sim_elapsed_ms += config.tick_interval_ms;
            if sim_elapsed_ms >= config.update_interval_ms {
                sim_elapsed_ms = 0;
                hw_timer::set_keepalive_due();
            }
        }

        if hw_timer::take_keepalive_due() {
            controller.note_keepalive_due();
        }

        let now_ms = clock.uptime_ms();
        controller.tick(now_ms, &mut hub, &mut display);
        wifi.poll();

        if controller.reset_requested() {
            break;
        }
    }

    // ── 6. Shutdown ───────────────────────────────────────────
    info!("Reset requested — shutting down");
    hw_timer::stop_keepalive_timer();
    controller.finalize(clock.uptime_ms());
    display.clear();
    if let Err(e) = hub.finalize() {
        warn!("hub finalize failed: {e}");
    }
    wifi.disconnect();

    #[cfg(target_os = "espidf")]
    {
        // SAFETY: esp_restart never returns; all peripherals are quiesced.
        unsafe { esp_idf_svc::sys::esp_restart() };
        #[allow(unreachable_code)]
        unreachable!("esp_restart returned")
    }

    #[cfg(not(target_os = "espidf"))]
    Ok(())
}
