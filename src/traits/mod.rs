//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstractions that allow rs-junction to
//! run on different hardware (ESP32, desktop mock).
//!
//! # Submodules
//!
//! - `hardware`: Actuators, sensors, serial link, push button, clock
//! - `platform`: The [`Platform`] bundle naming one board's device types
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`OutputDevice`]: On/off capability of lights and the buzzer
//! - [`DistanceSensor`]: Ultrasonic ranging in centimetres
//! - [`LightSensor`]: Ambient light level
//! - [`SerialPort`]: Mode code input and status output
//! - [`PushButton`]: Interrupt-driven crossing button

pub mod hardware;
pub mod platform;

pub use hardware::*;
pub use platform::*;
