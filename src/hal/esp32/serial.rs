//! UART link for mode codes and status lines.
//!
//! # Wiring
//!
//! - GPIO21 → USB-serial adapter RX
//! - GPIO20 ← USB-serial adapter TX
//!
//! The SuperMini's native USB port carries the ESP-IDF console and logs, so
//! the mode link lives on UART1.

use crate::config::SerialConfig;
use crate::traits::SerialPort;
use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::uart::{self, Uart, UartDriver};

/// Serial port for ESP32.
///
/// Reads never block; writes append CRLF.
///
/// # Example
///
/// ```ignore
/// use rs_junction::hal::esp32::Esp32Serial;
/// use rs_junction::traits::SerialPort;
/// use rs_junction::SerialConfig;
///
/// let peripherals = Peripherals::take()?;
/// let mut serial = Esp32Serial::new(
///     peripherals.uart1,
///     peripherals.pins.gpio21,
///     peripherals.pins.gpio20,
///     &SerialConfig::default(),
/// )?;
///
/// serial.write_line("MODE: Regular")?;
/// if let Some(byte) = serial.read_byte()? {
///     println!("got {byte}");
/// }
/// ```
pub struct Esp32Serial<'d> {
    uart: UartDriver<'d>,
}

impl<'d> Esp32Serial<'d> {
    /// Line ending appended to every status line.
    const LINE_END: &'static [u8] = b"\r\n";

    /// Opens the UART at `config.baud_rate`, 8N1, no flow control.
    ///
    /// # Errors
    ///
    /// Returns an error if UART initialization fails.
    pub fn new<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        config: &SerialConfig,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config,
        )?;

        Ok(Self { uart })
    }
}

impl SerialPort for Esp32Serial<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        let n = self.uart.read(&mut buf, NON_BLOCK)?;
        Ok((n > 0).then_some(buf[0]))
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.uart.write(line.as_bytes())?;
        self.uart.write(Self::LINE_END)?;
        Ok(())
    }
}
