//! Status lines over the wireless serial link.
//!
//! Formats each [`AppEvent`] with [`report::render`] and pushes the lines
//! through a [`ByteSink`].  A failed write is logged and dropped; the
//! control loop never stalls on the radio.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{ByteSink, EventSink};
use crate::app::report;
use crate::error::SinkError;

pub struct SerialReporter<S> {
    sink: S,
    dropped: u32,
}

impl<S: ByteSink> SerialReporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, dropped: 0 }
    }

    /// Events that could not be delivered.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn send(&mut self, event: &AppEvent) -> Result<(), SinkError> {
        for line in report::render(event)? {
            self.sink.write_all(line.as_bytes())?;
        }
        self.sink.flush()
    }
}

impl<S: ByteSink> EventSink for SerialReporter<S> {
    fn emit(&mut self, event: &AppEvent) {
        if let Err(e) = self.send(event) {
            self.dropped = self.dropped.saturating_add(1);
            warn!("serial report: {} ({} dropped)", e, self.dropped);
        }
    }
}
