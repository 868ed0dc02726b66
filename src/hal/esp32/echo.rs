//! HC-SR04 trigger/echo pins and lamp outputs on ESP32 GPIO.
//!
//! # Wiring
//!
//! - GPIO3 → TRIG
//! - GPIO4 ← ECHO (through a 5V to 3.3V divider)
//!
//! Lamps are plain push-pull outputs, so any `PinDriver` in output mode is
//! a [`DigitalOutput`].

use crate::traits::{DigitalOutput, EchoPins};
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;

impl<T: OutputPin> DigitalOutput for PinDriver<'_, T, Output> {
    type Error = esp_idf_hal::sys::EspError;

    #[inline]
    fn drive(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

/// Trigger and echo pins of an ultrasonic ranger.
///
/// Wrap in [`Ultrasonic`](crate::Ultrasonic) together with
/// [`Ets`](esp_idf_hal::delay::Ets) and
/// [`Esp32Clock`](super::Esp32Clock) to measure distances.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::delay::Ets;
/// use rs_junction::hal::esp32::{Esp32Clock, Esp32Echo};
/// use rs_junction::Ultrasonic;
///
/// let peripherals = Peripherals::take()?;
/// let pins = Esp32Echo::new(
///     peripherals.pins.gpio3.downgrade_output(),
///     peripherals.pins.gpio4.downgrade_input(),
/// )?;
/// let mut ranger = Ultrasonic::new(pins, Ets, Esp32Clock::new());
/// ```
pub struct Esp32Echo<'d> {
    trigger: PinDriver<'d, AnyOutputPin, Output>,
    echo: PinDriver<'d, AnyInputPin, Input>,
}

impl<'d> Esp32Echo<'d> {
    /// Configures the trigger as an output (driven low) and echo as an input.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        trigger: impl Peripheral<P = AnyOutputPin> + 'd,
        echo: impl Peripheral<P = AnyInputPin> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut trigger = PinDriver::output(trigger)?;
        trigger.set_low()?;
        let echo = PinDriver::input(echo)?;

        Ok(Self { trigger, echo })
    }
}

impl EchoPins for Esp32Echo<'_> {
    type Error = esp_idf_hal::sys::EspError;

    #[inline]
    fn set_trigger(&mut self, high: bool) -> Result<(), Self::Error> {
        self.trigger.drive(high)
    }

    #[inline]
    fn echo_is_high(&mut self) -> bool {
        self.echo.is_high()
    }
}
