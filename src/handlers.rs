//! Mode handler bodies.
//!
//! [`Intersection`] owns every device the handlers touch. Each `run_*`
//! method performs one complete pass of its mode and blocks through the
//! platform delay until the sequence is finished.
//!
//! | Mode | Sensors read | Longest blocking stretch |
//! |------|--------------|--------------------------|
//! | Regular | none | 6 s full cycle |
//! | Pedestrian | distance | 2 s flash or a Regular cycle |
//! | Night | light, distance when dark | Regular cycle when bright |
//! | Manual | none (button latch) | 12 s alarm |

use embedded_hal::delay::DelayNs;

use crate::actuators::Signal;
use crate::config::{ThresholdConfig, TimingConfig};
use crate::latch::ButtonLatch;
use crate::traits::{DistanceSensor, LightSensor, OutputDevice, Platform};

/// All devices of one intersection plus the timing and thresholds that
/// shape the handler sequences.
///
/// Fields are public so tests and simulators can inspect the actuators
/// between runs.
pub struct Intersection<H: Platform> {
    /// Green lamp.
    pub green: H::Light,
    /// Yellow lamp.
    pub yellow: H::Light,
    /// Red lamp.
    pub red: H::Light,
    /// Buzzer.
    pub buzzer: H::Buzzer,
    /// Ultrasonic ranger.
    pub distance: H::Distance,
    /// Photoresistor.
    pub ambient: H::Ambient,
    /// Blocking delay for all named waits.
    pub delay: H::Delay,
    timing: TimingConfig,
    thresholds: ThresholdConfig,
}

impl<H: Platform> Intersection<H> {
    /// Assemble an intersection with default timing and thresholds.
    pub fn new(
        green: H::Light,
        yellow: H::Light,
        red: H::Light,
        buzzer: H::Buzzer,
        distance: H::Distance,
        ambient: H::Ambient,
        delay: H::Delay,
    ) -> Self {
        Self {
            green,
            yellow,
            red,
            buzzer,
            distance,
            ambient,
            delay,
            timing: TimingConfig::default(),
            thresholds: ThresholdConfig::default(),
        }
    }

    /// Replace the handler timing.
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the sensor thresholds.
    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Current handler timing.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Current sensor thresholds.
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Borrow a lamp by colour.
    pub fn light(&self, signal: Signal) -> &H::Light {
        match signal {
            Signal::Green => &self.green,
            Signal::Yellow => &self.yellow,
            Signal::Red => &self.red,
        }
    }

    /// Mutably borrow a lamp by colour.
    pub fn light_mut(&mut self, signal: Signal) -> &mut H::Light {
        match signal {
            Signal::Green => &mut self.green,
            Signal::Yellow => &mut self.yellow,
            Signal::Red => &mut self.red,
        }
    }

    /// Lamps currently lit.
    pub fn lit(&self) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL
            .into_iter()
            .filter(move |s| self.light(*s).is_on())
    }

    /// Switch all three lamps off (red, green, yellow). The buzzer is left alone.
    pub fn all_lights_off(&mut self) -> Result<(), H::Error> {
        self.red.off()?;
        self.green.off()?;
        self.yellow.off()
    }

    /// Light one lamp for `ms`, then switch it off.
    fn show(&mut self, signal: Signal, ms: u32) -> Result<(), H::Error> {
        self.light_mut(signal).on()?;
        self.delay.delay_ms(ms);
        self.light_mut(signal).off()
    }

    /// Regular cycle: red, yellow, green, yellow.
    pub fn run_regular(&mut self) -> Result<(), H::Error> {
        log::trace!("handler: regular");
        let t = self.timing.clone();
        self.show(Signal::Red, t.red_ms)?;
        self.show(Signal::Yellow, t.yellow_ms)?;
        self.show(Signal::Green, t.green_ms)?;
        self.show(Signal::Yellow, t.yellow_ms)
    }

    /// Pedestrian crossing.
    ///
    /// With someone near the kerb the buzzer sounds while yellow flashes;
    /// otherwise a Regular cycle runs. The buzzer always ends silent.
    pub fn run_pedestrian(&mut self) -> Result<(), H::Error> {
        log::trace!("handler: pedestrian");
        let cm = self.distance.distance_cm()?;
        log::debug!("pedestrian: distance {cm}cm");

        let result = if self.thresholds.is_near(cm) {
            self.flash_warning()
        } else {
            self.run_regular()
        };
        // Silence the buzzer even when the sequence failed part way
        let silenced = self.buzzer.off();
        result.and(silenced)
    }

    fn flash_warning(&mut self) -> Result<(), H::Error> {
        let t = self.timing.clone();
        self.buzzer.on()?;
        for _ in 0..t.flash_count {
            self.yellow.on()?;
            self.delay.delay_ms(t.flash_on_ms);
            self.yellow.off()?;
            self.delay.delay_ms(t.flash_off_ms);
        }
        Ok(())
    }

    /// Night operation.
    ///
    /// When dark the junction rests on red and switches to green for an
    /// approaching object. When bright it falls back to a Regular cycle.
    pub fn run_night(&mut self) -> Result<(), H::Error> {
        log::trace!("handler: night");
        let level = self.ambient.level()?;
        log::debug!("night: light level {level}");

        if self.thresholds.is_dark(level) {
            let cm = self.distance.distance_cm()?;
            log::debug!("night: distance {cm}cm");
            if self.thresholds.is_near(cm) {
                self.red.off()?;
                self.green.on()
            } else {
                self.green.off()?;
                self.red.on()
            }
        } else {
            self.green.off()?;
            self.red.off()?;
            self.run_regular()
        }
    }

    /// Manual crossing.
    ///
    /// Holds green until `latch` reports a press, then runs the stop alarm
    /// and clears the latch.
    pub fn run_manual(&mut self, latch: &ButtonLatch) -> Result<(), H::Error> {
        log::trace!("handler: manual");
        if !latch.is_pressed() {
            return self.green.on();
        }

        log::debug!("manual: button pressed, running alarm");
        let t = self.timing.clone();
        self.green.off()?;
        self.show(Signal::Yellow, t.notice_ms)?;
        self.buzzer.on()?;
        self.red.on()?;
        self.delay.delay_ms(t.alarm_ms);
        self.buzzer.off()?;
        self.red.off()?;
        self.show(Signal::Yellow, t.notice_ms)?;
        latch.clear();
        Ok(())
    }
}
