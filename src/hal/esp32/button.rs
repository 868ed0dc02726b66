//! Manual crossing push button with a falling-edge GPIO interrupt.
//!
//! # Wiring
//!
//! - GPIO1 → button → GND (internal pull-up, active low)
//!
//! The ESP-IDF GPIO driver disables a pin's interrupt after each delivery,
//! so [`PushButton::service`] re-enables it once per loop iteration.

use crate::latch::ButtonLatch;
use crate::traits::PushButton;
use esp_idf_hal::gpio::{AnyIOPin, Input, InterruptType, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;

/// Push button for ESP32.
///
/// # Example
///
/// ```ignore
/// use rs_junction::hal::esp32::Esp32Button;
/// use rs_junction::traits::PushButton;
/// use rs_junction::ButtonLatch;
///
/// static LATCH: ButtonLatch = ButtonLatch::new();
///
/// let peripherals = Peripherals::take()?;
/// let mut button = Esp32Button::new(peripherals.pins.gpio1.downgrade())?;
/// button.attach(&LATCH)?;
///
/// loop {
///     button.service()?;
///     if LATCH.is_pressed() {
///         println!("Button pressed!");
///         LATCH.clear();
///     }
/// }
/// ```
pub struct Esp32Button<'d> {
    pin: PinDriver<'d, AnyIOPin, Input>,
    subscribed: bool,
}

impl<'d> Esp32Button<'d> {
    /// Configures the pin as a pulled-up input with no interrupt attached.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        pin: impl Peripheral<P = AnyIOPin> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut pin = PinDriver::input(pin)?;
        pin.set_pull(Pull::Up)?;
        pin.set_interrupt_type(InterruptType::NegEdge)?;

        Ok(Self {
            pin,
            subscribed: false,
        })
    }

    /// Returns true while the button is held down.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.pin.is_low()
    }
}

impl PushButton for Esp32Button<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn attach(&mut self, latch: &'static ButtonLatch) -> Result<(), Self::Error> {
        // Safe: the callback only touches an atomic and runs no allocator or
        // blocking code in ISR context
        unsafe {
            self.pin.subscribe(move || latch.press())?;
        }
        self.subscribed = true;
        self.pin.enable_interrupt()
    }

    fn detach(&mut self) -> Result<(), Self::Error> {
        self.subscribed = false;
        self.pin.unsubscribe()
    }

    fn service(&mut self) -> Result<(), Self::Error> {
        if self.subscribed {
            self.pin.enable_interrupt()?;
        }
        Ok(())
    }
}
