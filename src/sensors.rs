//! Distance and light sensor drivers.
//!
//! - [`Ultrasonic`]: HC-SR04 style ranger built on [`EchoPins`], a
//!   microsecond [`DelayNs`] and a [`Clock`]
//! - [`Photoresistor`]: LDR voltage divider sampled through [`AnalogInput`]
//!
//! # Echo Timeout
//!
//! When no echo arrives within the timeout the ranger reports a distance of
//! `0`, which the mode handlers read as "object within range".

use embedded_hal::delay::DelayNs;

use crate::config::SensorConfig;
use crate::traits::{AnalogInput, Clock, DistanceSensor, EchoPins, LightSensor};

/// Trigger line settle time before the pulse.
pub const TRIGGER_SETTLE_US: u32 = 2;

/// Trigger pulse width.
pub const TRIGGER_PULSE_US: u32 = 5;

/// Microseconds of sound travel per centimetre (rounded).
pub const US_PER_CM: u64 = 29;

/// Top of the light level scale.
pub const LIGHT_FULL_SCALE: u32 = 5000;

/// Convert an echo pulse width to centimetres.
///
/// The pulse covers the round trip, hence the halving.
///
/// ```
/// use rs_junction::sensors::echo_to_cm;
///
/// assert_eq!(echo_to_cm(0), 0);
/// assert_eq!(echo_to_cm(580), 10);
/// assert_eq!(echo_to_cm(579), 9);
/// ```
#[inline]
pub const fn echo_to_cm(echo_us: u64) -> u32 {
    (echo_us / US_PER_CM / 2) as u32
}

/// Scale a raw ADC sample to the 0-5000 light level.
///
/// ```
/// use rs_junction::sensors::scale_light_level;
///
/// assert_eq!(scale_light_level(0, 10), 0);
/// assert_eq!(scale_light_level(1023, 10), 4995);
/// assert_eq!(scale_light_level(4095, 12), 4998);
/// ```
#[inline]
pub const fn scale_light_level(raw: u16, resolution_bits: u32) -> u32 {
    let level = (raw as u32 * LIGHT_FULL_SCALE) >> resolution_bits;
    if level > LIGHT_FULL_SCALE {
        LIGHT_FULL_SCALE
    } else {
        level
    }
}

// ============================================================================
// Ultrasonic ranger
// ============================================================================

/// Ultrasonic distance sensor.
///
/// Each reading sends a 5 µs trigger pulse and times the echo pulse.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::{MockClock, MockDelay, MockEcho, Timeline};
/// use rs_junction::sensors::Ultrasonic;
/// use rs_junction::traits::DistanceSensor;
///
/// let timeline = Timeline::new();
/// let clock = MockClock::new();
/// // Echo rises 100 µs after the trigger and lasts 1160 µs (20 cm)
/// let echo = MockEcho::new(&clock, &timeline).with_pulse(100, 1160);
/// let delay = MockDelay::new(&timeline).with_clock(&clock);
///
/// let mut sensor = Ultrasonic::new(echo, delay, clock);
/// assert_eq!(sensor.distance_cm().unwrap(), 20);
/// ```
pub struct Ultrasonic<P, D, C>
where
    P: EchoPins,
    D: DelayNs,
    C: Clock,
{
    pins: P,
    delay: D,
    clock: C,
    timeout_us: u64,
}

impl<P, D, C> Ultrasonic<P, D, C>
where
    P: EchoPins,
    D: DelayNs,
    C: Clock,
{
    /// Creates a ranger with the default echo timeout.
    pub fn new(pins: P, delay: D, clock: C) -> Self {
        Self::with_config(pins, delay, clock, &SensorConfig::default())
    }

    /// Creates a ranger using the timeout from `config`.
    pub fn with_config(pins: P, delay: D, clock: C, config: &SensorConfig) -> Self {
        Self {
            pins,
            delay,
            clock,
            timeout_us: config.echo_timeout_us as u64,
        }
    }

    /// Returns the echo timeout in microseconds.
    pub fn timeout_us(&self) -> u64 {
        self.timeout_us
    }

    /// Borrow the pin pair.
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Send the trigger pulse: low, 2 µs, high, 5 µs, low.
    fn trigger(&mut self) -> Result<(), P::Error> {
        self.pins.set_trigger(false)?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.pins.set_trigger(true)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.pins.set_trigger(false)
    }

    fn timed_out(&self, started: u64) -> bool {
        self.clock.now_us().saturating_sub(started) >= self.timeout_us
    }

    /// Width of the next high pulse on the echo line, or `None` on timeout.
    ///
    /// A pulse already in progress is skipped. The timeout covers the whole
    /// measurement, not each stage.
    fn echo_width_us(&mut self) -> Option<u64> {
        let started = self.clock.now_us();

        while self.pins.echo_is_high() {
            if self.timed_out(started) {
                return None;
            }
        }
        while !self.pins.echo_is_high() {
            if self.timed_out(started) {
                return None;
            }
        }
        let rise = self.clock.now_us();
        while self.pins.echo_is_high() {
            if self.timed_out(started) {
                return None;
            }
        }
        Some(self.clock.now_us().saturating_sub(rise))
    }
}

impl<P, D, C> DistanceSensor for Ultrasonic<P, D, C>
where
    P: EchoPins,
    D: DelayNs,
    C: Clock,
{
    type Error = P::Error;

    fn distance_cm(&mut self) -> Result<u32, Self::Error> {
        self.trigger()?;
        let cm = match self.echo_width_us() {
            Some(width) => echo_to_cm(width),
            None => {
                log::debug!("ultrasonic: no echo within {}us", self.timeout_us);
                0
            }
        };
        Ok(cm)
    }
}

// ============================================================================
// Photoresistor
// ============================================================================

/// Light dependent resistor read through an ADC channel.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::MockAnalog;
/// use rs_junction::sensors::Photoresistor;
/// use rs_junction::traits::LightSensor;
///
/// let mut ldr = Photoresistor::new(MockAnalog::new(512));
/// assert_eq!(ldr.level().unwrap(), 2500);
/// ```
#[derive(Debug)]
pub struct Photoresistor<A: AnalogInput> {
    adc: A,
}

impl<A: AnalogInput> Photoresistor<A> {
    /// Wrap an analog channel.
    pub fn new(adc: A) -> Self {
        Self { adc }
    }

    /// Borrow the underlying channel.
    pub fn adc(&self) -> &A {
        &self.adc
    }

    /// Mutably borrow the underlying channel.
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogInput> LightSensor for Photoresistor<A> {
    type Error = A::Error;

    fn level(&mut self) -> Result<u32, Self::Error> {
        let raw = self.adc.read_raw()?;
        Ok(scale_light_level(raw, A::RESOLUTION_BITS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{Event, MockAnalog, MockClock, MockDelay, MockEcho, Timeline};
    use core::convert::Infallible;

    fn ranger(
        echo: impl FnOnce(&MockClock, &Timeline) -> MockEcho,
    ) -> (Ultrasonic<MockEcho, MockDelay, MockClock>, Timeline) {
        let timeline = Timeline::new();
        let clock = MockClock::new();
        let pins = echo(&clock, &timeline);
        let delay = MockDelay::new(&timeline).with_clock(&clock);
        (Ultrasonic::new(pins, delay, clock), timeline)
    }

    // =========================================================================
    // Conversion Tests
    // =========================================================================

    #[test]
    fn echo_to_cm_uses_integer_division() {
        assert_eq!(echo_to_cm(57), 0);
        assert_eq!(echo_to_cm(58), 1);
        assert_eq!(echo_to_cm(290), 5);
        assert_eq!(echo_to_cm(5800), 100);
    }

    #[test]
    fn light_level_ten_bit_matches_float_scaling() {
        for raw in [0u16, 1, 100, 614, 615, 1023] {
            let expected = (raw as f64 * (5000.0 / 1024.0)) as u32;
            assert_eq!(scale_light_level(raw, 10), expected, "raw={raw}");
        }
    }

    #[test]
    fn light_level_threshold_boundary() {
        // 614 * 5000 / 1024 = 2998.04, 615 -> 3002.9
        assert!(scale_light_level(614, 10) < 3000);
        assert!(scale_light_level(615, 10) >= 3000);
    }

    #[test]
    fn light_level_clamped_to_full_scale() {
        assert_eq!(scale_light_level(u16::MAX, 10), LIGHT_FULL_SCALE);
    }

    // =========================================================================
    // Ultrasonic Tests
    // =========================================================================

    #[test]
    fn trigger_sequence_timing() {
        let (mut sensor, timeline) = ranger(|c, t| MockEcho::new(c, t).with_pulse(10, 580));
        sensor.distance_cm().unwrap();

        let events = timeline.events();
        assert_eq!(
            &events[..5],
            &[
                Event::Trigger { high: false },
                Event::WaitUs { us: 2 },
                Event::Trigger { high: true },
                Event::WaitUs { us: 5 },
                Event::Trigger { high: false },
            ]
        );
    }

    #[test]
    fn converts_echo_width() {
        let (mut sensor, _) = ranger(|c, t| MockEcho::new(c, t).with_pulse(50, 580));
        assert_eq!(sensor.distance_cm().unwrap(), 10);

        let (mut sensor, _) = ranger(|c, t| MockEcho::new(c, t).with_pulse(50, 290));
        assert_eq!(sensor.distance_cm().unwrap(), 5);
    }

    #[test]
    fn missing_echo_reads_zero() {
        let (mut sensor, _) = ranger(MockEcho::new);
        assert_eq!(sensor.distance_cm().unwrap(), 0);
    }

    #[test]
    fn echo_beyond_timeout_reads_zero() {
        let (mut sensor, _) = ranger(|c, t| MockEcho::new(c, t).with_pulse(10, 2_000_000));
        assert_eq!(sensor.timeout_us(), 1_000_000);
        assert_eq!(sensor.distance_cm().unwrap(), 0);
    }

    #[test]
    fn custom_timeout_from_config() {
        let timeline = Timeline::new();
        let clock = MockClock::new();
        let pins = MockEcho::new(&clock, &timeline).with_pulse(10, 5800);
        let delay = MockDelay::new(&timeline).with_clock(&clock);
        let config = SensorConfig::default().with_echo_timeout_us(1_000);

        let mut sensor = Ultrasonic::with_config(pins, delay, clock, &config);
        assert_eq!(sensor.distance_cm().unwrap(), 0);
    }

    #[test]
    fn pulse_in_progress_is_skipped() {
        // Echo already high when measurement starts: its tail must not count
        let (mut sensor, _) = ranger(|c, t| {
            MockEcho::new(c, t)
                .with_stale_high(300)
                .with_pulse(400, 1160)
        });
        assert_eq!(sensor.distance_cm().unwrap(), 20);
    }

    // =========================================================================
    // Photoresistor Tests
    // =========================================================================

    struct TwelveBit(u16);

    impl AnalogInput for TwelveBit {
        type Error = Infallible;
        const RESOLUTION_BITS: u32 = 12;

        fn read_raw(&mut self) -> Result<u16, Infallible> {
            Ok(self.0)
        }
    }

    #[test]
    fn photoresistor_ten_bit() {
        let mut ldr = Photoresistor::new(MockAnalog::new(0));
        assert_eq!(ldr.level().unwrap(), 0);

        ldr.adc_mut().set(1023);
        assert_eq!(ldr.level().unwrap(), 4995);
        assert_eq!(ldr.adc().reads, 2);
    }

    #[test]
    fn photoresistor_twelve_bit_same_scale() {
        let mut ldr = Photoresistor::new(TwelveBit(2048));
        assert_eq!(ldr.level().unwrap(), 2500);
    }
}
