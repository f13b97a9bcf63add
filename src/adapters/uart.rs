//! XBee UART transport (9600 8N1).

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{config::Config, Uart, UartDriver};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use crate::app::ports::ByteSink;
use crate::error::SinkError;
use crate::pins;

pub struct XbeeUart {
    uart: UartDriver<'static>,
}

impl XbeeUart {
    /// Open the link.  Failure leaves the controller running without
    /// remote reporting.
    pub fn open<U: Uart>(
        uart: impl Peripheral<P = U> + 'static,
        tx: impl Peripheral<P = impl OutputPin> + 'static,
        rx: impl Peripheral<P = impl InputPin> + 'static,
    ) -> Result<Self, SinkError> {
        let config = Config::default().baudrate(Hertz(pins::XBEE_BAUD));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )
        .map_err(|e| {
            warn!("XBee UART open failed: {}", e);
            SinkError::OpenFailed
        })?;
        info!("XBee UART open at {} baud", pins::XBEE_BAUD);
        Ok(Self { uart })
    }
}

impl ByteSink for XbeeUart {
    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), SinkError> {
        while !bytes.is_empty() {
            let n = self
                .uart
                .write(bytes)
                .map_err(|_| SinkError::WriteFailed)?;
            if n == 0 {
                return Err(SinkError::WriteFailed);
            }
            bytes = &bytes[n..];
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.uart
            .wait_tx_done(BLOCK)
            .map_err(|_| SinkError::WriteFailed)
    }
}
