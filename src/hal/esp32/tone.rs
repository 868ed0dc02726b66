//! Passive buzzer tone generation using ESP32 LEDC PWM.
//!
//! A passive buzzer needs a square wave at the desired pitch. The LEDC
//! timer runs at the tone frequency and the channel duty switches between
//! 50% (sounding) and 0% (silent).

use crate::config::BuzzerConfig;
use crate::traits::ToneOutput;
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;

/// LEDC tone generator for the buzzer.
///
/// # Hardware Setup
///
/// - GPIO10 → buzzer +
/// - buzzer - → GND
///
/// # Example
///
/// ```ignore
/// use rs_junction::hal::esp32::Esp32Tone;
/// use rs_junction::{Buzzer, BuzzerConfig};
///
/// let peripherals = Peripherals::take()?;
/// let tone = Esp32Tone::new(
///     peripherals.pins.gpio10,
///     peripherals.ledc.timer0,
///     peripherals.ledc.channel0,
///     &BuzzerConfig::default(),
/// )?;
/// let mut buzzer = Buzzer::new(tone);
/// ```
pub struct Esp32Tone<'d> {
    channel: LedcDriver<'d>,
    /// Duty for a 50% square wave
    half_duty: u32,
}

impl<'d> Esp32Tone<'d> {
    /// PWM resolution (10-bit is plenty for a square wave)
    const PWM_RESOLUTION: Resolution = Resolution::Bits10;

    /// Creates a silent tone generator at `config.frequency_hz`.
    ///
    /// # Errors
    ///
    /// Returns an error if LEDC initialization fails.
    pub fn new<T, TI, C, CI, P, PI>(
        pin: P,
        timer: T,
        channel: C,
        config: &BuzzerConfig,
    ) -> Result<Self, esp_idf_hal::sys::EspError>
    where
        TI: esp_idf_hal::ledc::LedcTimer + 'd,
        T: Peripheral<P = TI> + 'd,
        CI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        C: Peripheral<P = CI> + 'd,
        PI: esp_idf_hal::gpio::OutputPin + 'd,
        P: Peripheral<P = PI> + 'd,
    {
        let timer_config = TimerConfig::default()
            .frequency(config.frequency_hz.Hz())
            .resolution(Self::PWM_RESOLUTION);
        let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;

        // Channel takes ownership so the timer lives as long as the tone
        let mut channel = LedcDriver::new(channel, timer_driver, pin)?;
        let half_duty = channel.get_max_duty() / 2;
        channel.set_duty(0)?;

        Ok(Self { channel, half_duty })
    }
}

impl ToneOutput for Esp32Tone<'_> {
    type Error = esp_idf_hal::sys::EspError;

    fn start_tone(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty(self.half_duty)
    }

    fn stop_tone(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty(0)
    }
}
