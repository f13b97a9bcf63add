//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC console in production).

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::report_value;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(r) => {
                info!(
                    "CYCLE {} | state={:?} | air={} | soil={:?} sum={} | \
                     water={:?} sum={} | heater={} pump={} streak={} | halt={}",
                    r.cycle,
                    r.state,
                    report_value(r.air),
                    r.soil.map(report_value),
                    report_value(r.soil_sum),
                    r.water.map(report_value),
                    report_value(r.water_sum),
                    if r.heater { "ON" } else { "off" },
                    if r.pump { "ON" } else { "off" },
                    r.heater_streak,
                    crate::error::HaltCode::code_of(r.halt),
                );
            }
            AppEvent::Halted(code) => {
                error!("HALT | {} (code {})", code, code.code());
            }
            AppEvent::HaltRepeated(code) => {
                info!("HALT | still halted, code {}", code.code());
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
