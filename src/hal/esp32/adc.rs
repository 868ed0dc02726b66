//! Photoresistor sampling via the ESP32 ADC.
//!
//! # Wiring
//!
//! - 3.3V → LDR → GPIO0 → 10k → GND
//!
//! GPIO0 is ADC1 channel 0 on the ESP32-C3. ADC2 is unusable while WiFi is
//! active and is avoided.

use crate::traits::AnalogInput;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio0;
use esp_idf_hal::peripheral::Peripheral;

/// One-shot ADC channel for the light dependent resistor.
///
/// Wrap in [`Photoresistor`](crate::Photoresistor) to get the 0-5000 level.
///
/// # Example
///
/// ```ignore
/// use rs_junction::hal::esp32::Esp32LightAdc;
/// use rs_junction::Photoresistor;
///
/// let peripherals = Peripherals::take()?;
/// let adc = Esp32LightAdc::new(peripherals.adc1, peripherals.pins.gpio0)?;
/// let mut ldr = Photoresistor::new(adc);
/// ```
pub struct Esp32LightAdc<'d> {
    channel: AdcChannelDriver<'d, Gpio0, AdcDriver<'d, ADC1>>,
}

impl<'d> Esp32LightAdc<'d> {
    /// Creates the ADC1 driver and configures GPIO0 for full-range (DB_11)
    /// sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC initialization fails.
    pub fn new(
        adc: impl Peripheral<P = ADC1> + 'd,
        pin: impl Peripheral<P = Gpio0> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let driver = AdcDriver::new(adc)?;
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(driver, pin, &config)?;

        Ok(Self { channel })
    }
}

impl AnalogInput for Esp32LightAdc<'_> {
    type Error = esp_idf_hal::sys::EspError;
    const RESOLUTION_BITS: u32 = 12;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        self.channel.read()
    }
}
