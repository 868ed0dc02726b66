//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Configuration is built once at
//! startup; nothing here changes while the controller runs.
//!
//! # Example
//!
//! ```rust
//! use rs_junction::config::{Config, ThresholdConfig, TimingConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.timing.alarm_ms, 10_000);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_timing(TimingConfig::default().with_alarm_ms(5_000))
//!     .with_thresholds(ThresholdConfig::default().with_near_cm(15));
//! ```

use heapless::String as HString;

/// Maximum length for short config strings (device names)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Take only what fits
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Mode handler durations
    pub timing: TimingConfig,
    /// Sensor decision thresholds
    pub thresholds: ThresholdConfig,
    /// Sensor driver settings
    pub sensor: SensorConfig,
    /// Serial link settings
    pub serial: SerialConfig,
    /// Buzzer tone settings
    pub buzzer: BuzzerConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set threshold configuration
    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set sensor configuration
    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set serial configuration
    pub fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }

    /// Set buzzer configuration
    pub fn with_buzzer(mut self, buzzer: BuzzerConfig) -> Self {
        self.buzzer = buzzer;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Durations used by the mode handlers, all in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Regular cycle: red phase
    pub red_ms: u32,
    /// Regular cycle: each of the two yellow phases
    pub yellow_ms: u32,
    /// Regular cycle: green phase
    pub green_ms: u32,
    /// Pedestrian warning: number of yellow flashes
    pub flash_count: u8,
    /// Pedestrian warning: yellow lit per flash
    pub flash_on_ms: u32,
    /// Pedestrian warning: yellow dark per flash
    pub flash_off_ms: u32,
    /// Manual alarm: yellow before and after the red phase
    pub notice_ms: u32,
    /// Manual alarm: red and buzzer together
    pub alarm_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            red_ms: 2000,
            yellow_ms: 1000,
            green_ms: 2000,
            flash_count: 10,
            flash_on_ms: 100,
            flash_off_ms: 100,
            notice_ms: 1000,
            alarm_ms: 10_000,
        }
    }
}

impl TimingConfig {
    /// Set the regular cycle phases
    pub fn with_cycle_ms(mut self, red: u32, yellow: u32, green: u32) -> Self {
        self.red_ms = red;
        self.yellow_ms = yellow;
        self.green_ms = green;
        self
    }

    /// Set the pedestrian flash pattern
    pub fn with_flash(mut self, count: u8, on_ms: u32, off_ms: u32) -> Self {
        self.flash_count = count;
        self.flash_on_ms = on_ms;
        self.flash_off_ms = off_ms;
        self
    }

    /// Set the manual notice (yellow) duration
    pub fn with_notice_ms(mut self, ms: u32) -> Self {
        self.notice_ms = ms;
        self
    }

    /// Set the manual alarm (red + buzzer) duration
    pub fn with_alarm_ms(mut self, ms: u32) -> Self {
        self.alarm_ms = ms;
        self
    }

    /// Total duration of one regular cycle
    pub fn regular_cycle_ms(&self) -> u32 {
        self.red_ms
            .saturating_add(self.yellow_ms)
            .saturating_add(self.green_ms)
            .saturating_add(self.yellow_ms)
    }

    /// Total duration of one pedestrian warning
    pub fn flash_sequence_ms(&self) -> u32 {
        let period = self.flash_on_ms.saturating_add(self.flash_off_ms);
        u32::from(self.flash_count).saturating_mul(period)
    }

    /// Total duration of one manual alarm
    pub fn alarm_sequence_ms(&self) -> u32 {
        self.notice_ms
            .saturating_add(self.alarm_ms)
            .saturating_add(self.notice_ms)
    }
}

// ============================================================================
// Threshold Config
// ============================================================================

/// Sensor thresholds used by the Pedestrian and Night handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdConfig {
    /// An object closer than this (cm) counts as present
    pub near_cm: u32,
    /// A light level below this counts as dark
    pub dark_level: u32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            near_cm: 10,
            dark_level: 3000,
        }
    }
}

impl ThresholdConfig {
    /// Set the presence distance
    pub fn with_near_cm(mut self, cm: u32) -> Self {
        self.near_cm = cm;
        self
    }

    /// Set the darkness level
    pub fn with_dark_level(mut self, level: u32) -> Self {
        self.dark_level = level;
        self
    }

    /// Check a distance reading against the presence threshold
    pub fn is_near(&self, distance_cm: u32) -> bool {
        distance_cm < self.near_cm
    }

    /// Check a light level against the darkness threshold
    pub fn is_dark(&self, level: u32) -> bool {
        level < self.dark_level
    }
}

// ============================================================================
// Sensor Config
// ============================================================================

/// Sensor driver configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    /// Give up on an echo after this many microseconds
    pub echo_timeout_us: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            echo_timeout_us: 1_000_000,
        }
    }
}

impl SensorConfig {
    /// Set the echo timeout
    pub fn with_echo_timeout_us(mut self, us: u32) -> Self {
        self.echo_timeout_us = us;
        self
    }
}

// ============================================================================
// Serial Config
// ============================================================================

/// Serial link configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConfig {
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

impl SerialConfig {
    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }
}

// ============================================================================
// Buzzer Config
// ============================================================================

/// Buzzer tone configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuzzerConfig {
    /// Tone frequency in Hz
    pub frequency_hz: u32,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self { frequency_hz: 2000 }
    }
}

impl BuzzerConfig {
    /// Set the tone frequency
    pub fn with_frequency_hz(mut self, hz: u32) -> Self {
        self.frequency_hz = hz;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-junction"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
