//! ESP32-C3 SuperMini hardware abstraction layer for the intersection.
//!
//! This module provides hardware implementations for the ESP32-C3 SuperMini
//! board driving three LEDs, a passive buzzer, an HC-SR04 ranger, an LDR and
//! a crossing push button.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Lamps**: green, yellow and red LEDs with series resistors
//! - **Buzzer**: passive piezo driven by LEDC
//! - **Ranger**: HC-SR04 ultrasonic module
//! - **Light sensor**: LDR voltage divider on ADC1
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod adc;
mod button;
mod clock;
mod echo;
mod serial;
mod tone;

pub use adc::Esp32LightAdc;
pub use button::Esp32Button;
pub use clock::Esp32Clock;
pub use echo::Esp32Echo;
pub use serial::Esp32Serial;
pub use tone::Esp32Tone;

use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::actuators::{Buzzer, Light};
use crate::sensors::{Photoresistor, Ultrasonic};
use crate::traits::Platform;

/// Lamp on a downgraded GPIO output.
pub type Esp32Lamp = Light<PinDriver<'static, AnyOutputPin, Output>>;

/// Ultrasonic ranger busy-waiting with `Ets` and timed by [`Esp32Clock`].
pub type Esp32Ranger = Ultrasonic<Esp32Echo<'static>, Ets, Esp32Clock>;

/// The SuperMini board.
///
/// Every device reports [`EspError`](esp_idf_hal::sys::EspError). Handler
/// delays use `FreeRtos` so other tasks (and the idle watchdog) keep running
/// during long waits.
pub struct Esp32Platform;

impl Platform for Esp32Platform {
    type Error = esp_idf_hal::sys::EspError;
    type Light = Esp32Lamp;
    type Buzzer = Buzzer<Esp32Tone<'static>>;
    type Distance = Esp32Ranger;
    type Ambient = Photoresistor<Esp32LightAdc<'static>>;
    type Serial = Esp32Serial<'static>;
    type Button = Esp32Button<'static>;
    type Delay = FreeRtos;
}

/// Pin assignments for SuperMini ESP32-C3.
///
/// These constants match the wiring notes in each driver module:
/// - Lamps on GPIO5-7
/// - Ranger on GPIO3/4
/// - LDR on GPIO0 (ADC1), button on GPIO1
/// - Buzzer on GPIO10, UART1 on GPIO20/21
pub mod pins {
    // =========================================================================
    // Lamps
    // =========================================================================

    /// Green LED
    pub const GREEN: i32 = 5;

    /// Yellow LED
    pub const YELLOW: i32 = 6;

    /// Red LED
    pub const RED: i32 = 7;

    // =========================================================================
    // Buzzer
    // =========================================================================

    /// Passive buzzer (LEDC tone output)
    pub const BUZZER: i32 = 10;

    // =========================================================================
    // Sensors
    // =========================================================================

    /// Ultrasonic trigger output
    pub const TRIG: i32 = 3;

    /// Ultrasonic echo input (divided down to 3.3V)
    pub const ECHO: i32 = 4;

    /// LDR divider midpoint - ADC1 channel 0
    pub const LDR: i32 = 0;

    // =========================================================================
    // Operator Inputs
    // =========================================================================

    /// Crossing push button (active low, internal pull-up)
    pub const BUTTON: i32 = 1;

    /// UART1 transmit
    pub const UART_TX: i32 = 21;

    /// UART1 receive
    pub const UART_RX: i32 = 20;
}
