//! Status-line formatting for the wireless serial link.
//!
//! Every line is `label: v1,v2,...\n` with signed decimal values.  An
//! unavailable reading prints as
//! [`ProbeError::LEGACY_SENTINEL`](crate::error::ProbeError::LEGACY_SENTINEL) so
//! receivers built for the older controllers keep working.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::error::{HaltCode, SinkError};
use crate::sensors::report_value;

use super::events::{AppEvent, StatusReport};

/// Longest line the formatter produces.
pub const LINE_CAPACITY: usize = 96;

/// Most lines one event expands to.
pub const MAX_LINES: usize = 4;

pub type Line = String<LINE_CAPACITY>;

/// Format one `label: a,b,c\n` line.
pub fn format_line(label: &str, values: &[i32]) -> Result<Line, SinkError> {
    let mut line = Line::new();
    write!(line, "{label}: ").map_err(|_| SinkError::LineTooLong)?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            line.push(',').map_err(|()| SinkError::LineTooLong)?;
        }
        write!(line, "{v}").map_err(|_| SinkError::LineTooLong)?;
    }
    line.push('\n').map_err(|()| SinkError::LineTooLong)?;
    Ok(line)
}

/// Expand an event into its status lines.
pub fn render(event: &AppEvent) -> Result<Vec<Line, MAX_LINES>, SinkError> {
    let mut lines = Vec::new();
    let mut put = |line: Line| lines.push(line).map_err(|_| SinkError::LineTooLong);

    match event {
        AppEvent::Started(_) => put(format_line("Initializing Vegimeter", &[0])?)?,
        AppEvent::Status(r) => {
            for line in status_lines(r)? {
                put(line)?;
            }
        }
        AppEvent::Halted(code) | AppEvent::HaltRepeated(code) => {
            put(halt_line(*code)?)?;
        }
    }
    Ok(lines)
}

fn halt_line(code: HaltCode) -> Result<Line, SinkError> {
    format_line("Halt", &[i32::from(code.code())])
}

fn status_lines(r: &StatusReport) -> Result<[Line; 4], SinkError> {
    let [sa, sb, sc, sd] = r.soil.map(report_value);
    let [wa, wb] = r.water.map(report_value);
    Ok([
        format_line("Air", &[report_value(r.air)])?,
        format_line("Soil A,B,C,D,+", &[sa, sb, sc, sd, report_value(r.soil_sum)])?,
        format_line("Water A,B,+", &[wa, wb, report_value(r.water_sum)])?,
        format_line(
            "Heater,Pump,Streak",
            &[
                i32::from(r.heater),
                i32::from(r.pump),
                i32::try_from(r.heater_streak).unwrap_or(i32::MAX),
            ],
        )?,
    ])
}
