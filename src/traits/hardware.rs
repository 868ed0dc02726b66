//! Hardware abstraction traits for lights, buzzer, sensors, serial and button.
//!
//! This module defines the core hardware interfaces that allow rs-junction to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`OutputDevice`] | On/off capability shared by lights and the buzzer |
//! | [`DigitalOutput`] | Raw GPIO output behind a [`Light`](crate::Light) |
//! | [`ToneOutput`] | Tone generator behind a [`Buzzer`](crate::Buzzer) |
//! | [`DistanceSensor`] | Distance to the nearest object in centimetres |
//! | [`EchoPins`] | Trigger/echo pin pair of an ultrasonic ranger |
//! | [`LightSensor`] | Ambient light level on a 0-5000 scale |
//! | [`AnalogInput`] | Raw ADC channel behind a [`Photoresistor`](crate::Photoresistor) |
//! | [`SerialPort`] | Byte input and status line output |
//! | [`PushButton`] | Falling-edge interrupt attach/detach |
//! | [`Clock`] | Monotonic microsecond time source |
//!
//! Blocking waits use [`embedded_hal::delay::DelayNs`] rather than a trait of
//! our own.
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_junction::traits::OutputDevice;
//! use rs_junction::hal::{Device, MockPin, Timeline};
//! use rs_junction::Light;
//!
//! let timeline = Timeline::new();
//! let mut red = Light::new(MockPin::new(Device::Red, &timeline));
//! red.on().unwrap();
//! assert!(red.is_on());
//! ```

use core::fmt::Debug;

use crate::latch::ButtonLatch;

/// On/off capability of an actuator.
///
/// Implemented by [`Light`](crate::Light) and [`Buzzer`](crate::Buzzer).
/// Mode handlers only ever talk to actuators through this trait.
pub trait OutputDevice {
    /// Error type for output operations.
    type Error: Debug;

    /// Drive the output to its active state.
    fn on(&mut self) -> Result<(), Self::Error>;

    /// Drive the output to its inactive state.
    fn off(&mut self) -> Result<(), Self::Error>;

    /// Returns the last commanded state.
    fn is_on(&self) -> bool;

    /// Convenience method to switch by flag.
    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.on()
        } else {
            self.off()
        }
    }
}

/// A single digital output line.
pub trait DigitalOutput {
    /// Error type for pin writes.
    type Error: Debug;

    /// Drive the line high (`true`) or low (`false`).
    fn drive(&mut self, high: bool) -> Result<(), Self::Error>;
}

/// A tone generator driving a passive buzzer.
///
/// The tone frequency is fixed when the generator is built; this trait only
/// starts and silences it.
pub trait ToneOutput {
    /// Error type for tone operations.
    type Error: Debug;

    /// Start emitting the tone.
    fn start_tone(&mut self) -> Result<(), Self::Error>;

    /// Silence the output.
    fn stop_tone(&mut self) -> Result<(), Self::Error>;
}

/// Distance sensor trait.
///
/// # Implementation Notes
///
/// - Readings are taken fresh on every call; no caching
/// - A sensor timeout reports `Ok(0)` rather than an error
pub trait DistanceSensor {
    /// Error type for sensor operations.
    type Error: Debug;

    /// Returns the distance to the nearest object in centimetres.
    ///
    /// Blocks for the duration of the measurement.
    fn distance_cm(&mut self) -> Result<u32, Self::Error>;
}

/// Trigger and echo pins of an ultrasonic ranging module (HC-SR04 style).
pub trait EchoPins {
    /// Error type for the trigger output.
    type Error: Debug;

    /// Drive the trigger line.
    fn set_trigger(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Returns true while the echo line is high.
    fn echo_is_high(&mut self) -> bool;
}

/// Ambient light sensor trait.
pub trait LightSensor {
    /// Error type for sensor operations.
    type Error: Debug;

    /// Returns the light level on a 0-5000 scale (higher is brighter).
    fn level(&mut self) -> Result<u32, Self::Error>;
}

/// Raw analog input channel.
pub trait AnalogInput {
    /// Error type for conversions.
    type Error: Debug;

    /// Converter resolution in bits (10 for AVR, 12 for ESP32-C3).
    const RESOLUTION_BITS: u32;

    /// Take one conversion.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Serial link carrying mode codes in and status lines out.
pub trait SerialPort {
    /// Error type for serial operations.
    type Error: Debug;

    /// Returns the next received byte without blocking, if any.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write one line of text. The implementation appends the line ending.
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// Push button with falling-edge interrupt support.
///
/// # Implementation Notes
///
/// - The interrupt callback must do nothing but [`ButtonLatch::press`]
/// - `attach` is only called while detached and `detach` only while attached;
///   the controller tracks this
pub trait PushButton {
    /// Error type for interrupt configuration.
    type Error: Debug;

    /// Attach a falling-edge interrupt that presses `latch`.
    fn attach(&mut self, latch: &'static ButtonLatch) -> Result<(), Self::Error>;

    /// Detach the interrupt.
    fn detach(&mut self) -> Result<(), Self::Error>;

    /// Called once per loop iteration while attached.
    ///
    /// Default implementation does nothing. Override on platforms whose
    /// interrupt driver disarms itself after each edge.
    fn service(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in microseconds for echo pulse timing. On desktop,
/// this can wrap `std::time::Instant`. On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_junction::traits::Clock;
/// use rs_junction::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_us(), 0);
///
/// clock.advance_us(1500);
/// assert_eq!(clock.now_us(), 1500);
/// assert_eq!(clock.now_ms(), 1);
/// ```
pub trait Clock {
    /// Returns current time in microseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_us(&self) -> u64;

    /// Returns current time in milliseconds.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
