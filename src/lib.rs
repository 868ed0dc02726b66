//! # rs-junction
//!
//! A traffic intersection controller with serial mode selection, distance and
//! light sensing, and a manual crossing button.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for lamps, buzzer, ranger, light sensor, serial link and button
//! - **Four modes**: Regular cycle, Pedestrian warning, Night hold, Manual crossing
//! - **Single-byte protocol**: `'1'`..`'4'` select a mode, everything else is ignored
//! - **Interrupt latch**: The crossing button is only live while Manual is active
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions and the [`Platform`](traits::Platform) bundle
//! - `actuators` / `sensors` - Lamp, buzzer, ranger and photoresistor drivers
//! - `handlers` - The four mode sequences
//! - `controller` - Main loop: input, mode changes, dispatch
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_junction::hal::{leak_latch, mock_controller, Timeline};
//! use rs_junction::{Mode, SelectOutcome};
//!
//! let timeline = Timeline::new();
//! let latch = leak_latch();
//! let mut controller = mock_controller(&timeline, latch);
//!
//! // Operator sends '4' for Manual mode
//! controller.serial_mut().queue_bytes(b"4");
//! controller.step().unwrap();
//! assert_eq!(controller.mode(), Mode::Manual);
//!
//! // Someone presses the crossing button
//! controller.button_mut().fire();
//! controller.step().unwrap();
//! assert!(!latch.is_pressed());
//!
//! // A stray byte changes nothing
//! controller.serial_mut().queue_bytes(b"x");
//! assert_eq!(controller.step().unwrap(), SelectOutcome::Ignored { code: b'x' });
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Light and buzzer actuators built on digital and tone outputs.
pub mod actuators;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Mode-selection controller that runs the main loop.
pub mod controller;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Mode handler sequences.
pub mod handlers;
/// Interrupt-safe button latch.
pub mod latch;
/// Operating modes and their serial codes.
pub mod mode;
/// Ultrasonic ranger and photoresistor drivers.
pub mod sensors;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use actuators::{Buzzer, Light, Signal};
pub use controller::{ControllerState, ModeController, SelectOutcome};
pub use handlers::Intersection;
pub use latch::ButtonLatch;
pub use mode::Mode;
pub use sensors::{Photoresistor, Ultrasonic};
pub use traits::{
    AnalogInput, Clock, DigitalOutput, DistanceSensor, EchoPins, LightSensor, OutputDevice,
    Platform, PushButton, SerialPort, ToneOutput,
};

// Config re-exports
pub use config::{
    BuzzerConfig, Config, DeviceConfig, SensorConfig, SerialConfig, ThresholdConfig, TimingConfig,
};
