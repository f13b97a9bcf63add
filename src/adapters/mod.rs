//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements          | Connects to                |
//! |-----------------|---------------------|----------------------------|
//! | `hardware`      | SensorPort          | 1-Wire probes on a board   |
//! |                 | ActuatorPort        | Heater/pump relays, LED    |
//! | `log_sink`      | EventSink           | Serial log output          |
//! | `serial_report` | EventSink           | Status lines on a ByteSink |
//! | `uart`          | ByteSink            | XBee UART (ESP-IDF only)   |

pub mod hardware;
pub mod log_sink;
pub mod serial_report;
#[cfg(target_os = "espidf")]
pub mod uart;
