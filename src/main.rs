//! Vegimeter Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter<EspBoard>   LogEventSink   SerialReporter     │
//! │  (Sensor+Actuator+Delay)     (EventSink)    (EventSink, XBee)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FSM · Safety · Heat-pump hysteresis                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use vegimeter::adapters::hardware::HardwareAdapter;
use vegimeter::adapters::log_sink::LogEventSink;
use vegimeter::adapters::serial_report::SerialReporter;
use vegimeter::adapters::uart::XbeeUart;
use vegimeter::app::service::AppService;
use vegimeter::config::ControllerConfig;
use vegimeter::drivers::board::EspBoard;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Vegimeter v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ControllerConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Board + adapters ───────────────────────────────────
    let board = EspBoard::new(&config.lines)?;
    let mut hw = HardwareAdapter::new(board, &config);

    let peripherals = Peripherals::take()?;
    let xbee = match XbeeUart::open(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
    ) {
        Ok(uart) => Some(SerialReporter::new(uart)),
        Err(e) => {
            warn!("{}; continuing without remote reporting", e);
            None
        }
    };
    let mut sink = (LogEventSink::new(), xbee);

    // ── 4. Control loop ───────────────────────────────────────
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut sink);

    loop {
        app.tick(&mut hw, &mut sink);
        app.wait_for_next_cycle(&mut hw);
    }
}
