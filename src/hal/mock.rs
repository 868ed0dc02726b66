//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware traits, enabling
//! development and testing on desktop without physical hardware.
//!
//! Output-side mocks share a [`Timeline`] that records every light, buzzer,
//! delay, status line and interrupt event in order, so whole handler
//! sequences can be asserted exactly.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPin`] | [`DigitalOutput`] | Lamp output, records level changes |
//! | [`MockTone`] | [`ToneOutput`] | Buzzer output, records start/stop |
//! | [`MockDelay`] | [`DelayNs`] | Records waits, optionally advances a clock |
//! | [`MockClock`] | [`Clock`] | Shared controllable time source |
//! | [`MockEcho`] | [`EchoPins`] | Scripted ultrasonic echo pulse |
//! | [`MockAnalog`] | [`AnalogInput`] | Fixed 10-bit ADC reading |
//! | [`MockDistance`] | [`DistanceSensor`] | Scripted distance readings |
//! | [`MockAmbient`] | [`LightSensor`] | Scripted light levels |
//! | [`MockSerial`] | [`SerialPort`] | Queued input bytes, captured lines |
//! | [`MockButton`] | [`PushButton`] | Attach/detach tracking, simulated edges |
//!
//! # Example
//!
//! ```rust
//! use rs_junction::hal::{leak_latch, mock_controller, Event, Timeline};
//! use rs_junction::traits::OutputDevice;
//! use rs_junction::Mode;
//!
//! let timeline = Timeline::new();
//! let mut controller = mock_controller(&timeline, leak_latch());
//!
//! controller.serial_mut().queue_bytes(b"4");
//! controller.step().unwrap();
//!
//! assert_eq!(controller.mode(), Mode::Manual);
//! assert!(timeline.events().contains(&Event::Attach));
//! assert!(controller.intersection().green.is_on());
//! ```
//!
//! [`DigitalOutput`]: crate::traits::DigitalOutput
//! [`ToneOutput`]: crate::traits::ToneOutput
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`Clock`]: crate::traits::Clock
//! [`EchoPins`]: crate::traits::EchoPins
//! [`AnalogInput`]: crate::traits::AnalogInput
//! [`DistanceSensor`]: crate::traits::DistanceSensor
//! [`LightSensor`]: crate::traits::LightSensor
//! [`SerialPort`]: crate::traits::SerialPort
//! [`PushButton`]: crate::traits::PushButton

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::actuators::{Buzzer, Light, Signal};
use crate::config::Config;
use crate::controller::ModeController;
use crate::handlers::Intersection;
use crate::latch::ButtonLatch;
use crate::traits::{
    AnalogInput, Clock, DigitalOutput, DistanceSensor, EchoPins, LightSensor, Platform,
    PushButton, SerialPort, ToneOutput,
};

// ============================================================================
// Timeline
// ============================================================================

/// Output device identity used in [`Event::Output`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Device {
    /// Green lamp.
    Green,
    /// Yellow lamp.
    Yellow,
    /// Red lamp.
    Red,
    /// Buzzer.
    Buzzer,
}

impl From<Signal> for Device {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Green => Device::Green,
            Signal::Yellow => Device::Yellow,
            Signal::Red => Device::Red,
        }
    }
}

/// One recorded hardware interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A lamp or the buzzer switched.
    Output {
        /// Which output.
        device: Device,
        /// New state.
        on: bool,
    },
    /// Blocking delay in milliseconds.
    Wait {
        /// Duration.
        ms: u32,
    },
    /// Blocking delay in microseconds.
    WaitUs {
        /// Duration.
        us: u32,
    },
    /// Ultrasonic trigger line change.
    Trigger {
        /// New level.
        high: bool,
    },
    /// Line written to the serial port.
    Status(String),
    /// Button interrupt attached.
    Attach,
    /// Button interrupt detached.
    Detach,
}

impl Event {
    /// Shorthand for an output switching on.
    pub fn on(device: Device) -> Self {
        Event::Output { device, on: true }
    }

    /// Shorthand for an output switching off.
    pub fn off(device: Device) -> Self {
        Event::Output { device, on: false }
    }

    /// Shorthand for a millisecond wait.
    pub fn wait(ms: u32) -> Self {
        Event::Wait { ms }
    }
}

/// Shared, ordered log of [`Event`]s.
///
/// Cloning a timeline yields another handle to the same log.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Events recorded after position `mark` (see [`len`](Self::len)).
    pub fn since(&self, mark: usize) -> Vec<Event> {
        self.events.borrow().get(mark..).map(<[Event]>::to_vec).unwrap_or_default()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget all events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Sum of all millisecond waits.
    pub fn total_wait_ms(&self) -> u64 {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Wait { ms } => Some(*ms as u64),
                _ => None,
            })
            .sum()
    }

    /// All status lines written so far.
    pub fn statuses(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Status(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of events equal to `event`.
    pub fn count(&self, event: &Event) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }
}

// ============================================================================
// Output Mocks
// ============================================================================

/// Mock digital output for a lamp.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::{Device, Event, MockPin, Timeline};
/// use rs_junction::traits::DigitalOutput;
///
/// let timeline = Timeline::new();
/// let mut pin = MockPin::new(Device::Yellow, &timeline);
/// pin.drive(true).unwrap();
///
/// assert!(pin.is_high());
/// assert_eq!(pin.writes, 1);
/// assert_eq!(timeline.events(), vec![Event::on(Device::Yellow)]);
/// ```
#[derive(Debug)]
pub struct MockPin {
    device: Device,
    timeline: Timeline,
    high: bool,
    /// Number of writes.
    pub writes: usize,
}

impl MockPin {
    /// Creates a low pin that records into `timeline`.
    pub fn new(device: Device, timeline: &Timeline) -> Self {
        Self {
            device,
            timeline: timeline.clone(),
            high: false,
            writes: 0,
        }
    }

    /// Current output level.
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl DigitalOutput for MockPin {
    type Error = Infallible;

    fn drive(&mut self, high: bool) -> Result<(), Infallible> {
        self.high = high;
        self.writes += 1;
        self.timeline.push(Event::Output {
            device: self.device,
            on: high,
        });
        Ok(())
    }
}

/// Mock tone generator for the buzzer.
#[derive(Debug)]
pub struct MockTone {
    timeline: Timeline,
    sounding: bool,
    /// Number of times the tone was started.
    pub starts: usize,
}

impl MockTone {
    /// Creates a silent tone generator that records into `timeline`.
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            sounding: false,
            starts: 0,
        }
    }

    /// Returns true while the tone is playing.
    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

impl ToneOutput for MockTone {
    type Error = Infallible;

    fn start_tone(&mut self) -> Result<(), Infallible> {
        self.sounding = true;
        self.starts += 1;
        self.timeline.push(Event::on(Device::Buzzer));
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Infallible> {
        self.sounding = false;
        self.timeline.push(Event::off(Device::Buzzer));
        Ok(())
    }
}

// ============================================================================
// Timing Mocks
// ============================================================================

/// Mock clock for testing.
///
/// Clones share the same time, so a clock handed to a sensor can still be
/// advanced by the test or by a [`MockDelay`].
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    now_us: Rc<Cell<u64>>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in microseconds.
    pub fn set_us(&self, us: u64) {
        self.now_us.set(us);
    }

    /// Advances the clock by the given number of microseconds.
    pub fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

/// Mock blocking delay.
///
/// Records each wait in the timeline and, when given a clock, advances it by
/// the same amount so elapsed virtual time can be checked.
#[derive(Debug)]
pub struct MockDelay {
    timeline: Timeline,
    clock: Option<MockClock>,
}

impl MockDelay {
    /// Creates a delay that records into `timeline`.
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            clock: None,
        }
    }

    /// Advance `clock` on every wait.
    pub fn with_clock(mut self, clock: &MockClock) -> Self {
        self.clock = Some(clock.clone());
        self
    }

    fn advance(&self, us: u64) {
        if let Some(clock) = &self.clock {
            clock.advance_us(us);
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = ns.div_ceil(1000);
        self.timeline.push(Event::WaitUs { us });
        self.advance(us as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.push(Event::WaitUs { us });
        self.advance(us as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.timeline.push(Event::Wait { ms });
        self.advance(ms as u64 * 1000);
    }
}

// ============================================================================
// Sensor Mocks
// ============================================================================

/// Mock ultrasonic trigger/echo pair.
///
/// The echo is scripted relative to the moment the trigger pulse ends. Every
/// read of the echo line advances the shared clock by 1 µs, which models a
/// busy-wait loop.
#[derive(Debug)]
pub struct MockEcho {
    clock: MockClock,
    timeline: Timeline,
    trigger_high: bool,
    fired_at: Option<u64>,
    stale_high_us: u64,
    pulse: Option<(u64, u64)>,
    /// Number of completed trigger pulses.
    pub pings: usize,
}

impl MockEcho {
    /// Creates an echo line that never rises.
    pub fn new(clock: &MockClock, timeline: &Timeline) -> Self {
        Self {
            clock: clock.clone(),
            timeline: timeline.clone(),
            trigger_high: false,
            fired_at: None,
            stale_high_us: 0,
            pulse: None,
            pings: 0,
        }
    }

    /// Echo rises `after_us` after the trigger and stays high for `width_us`.
    pub fn with_pulse(mut self, after_us: u64, width_us: u64) -> Self {
        self.pulse = Some((after_us, width_us));
        self
    }

    /// Echo is already high for `us` when the trigger ends (tail of an old pulse).
    pub fn with_stale_high(mut self, us: u64) -> Self {
        self.stale_high_us = us;
        self
    }

    fn level_at(&self, now: u64) -> bool {
        let Some(fired) = self.fired_at else {
            return false;
        };
        let t = now.saturating_sub(fired);
        if t < self.stale_high_us {
            return true;
        }
        match self.pulse {
            Some((after, width)) => t >= after && t < after + width,
            None => false,
        }
    }
}

impl EchoPins for MockEcho {
    type Error = Infallible;

    fn set_trigger(&mut self, high: bool) -> Result<(), Infallible> {
        if self.trigger_high && !high {
            self.fired_at = Some(self.clock.now_us());
            self.pings += 1;
        }
        self.trigger_high = high;
        self.timeline.push(Event::Trigger { high });
        Ok(())
    }

    fn echo_is_high(&mut self) -> bool {
        let now = self.clock.now_us();
        self.clock.advance_us(1);
        self.level_at(now)
    }
}

/// Mock 10-bit analog channel.
#[derive(Debug, Default)]
pub struct MockAnalog {
    value: u16,
    /// Number of conversions taken.
    pub reads: usize,
}

impl MockAnalog {
    /// Creates a channel that always reads `value`.
    pub fn new(value: u16) -> Self {
        Self { value, reads: 0 }
    }

    /// Change the reading.
    pub fn set(&mut self, value: u16) {
        self.value = value;
    }
}

impl AnalogInput for MockAnalog {
    type Error = Infallible;
    const RESOLUTION_BITS: u32 = 10;

    fn read_raw(&mut self) -> Result<u16, Infallible> {
        self.reads += 1;
        Ok(self.value)
    }
}

/// Mock distance sensor.
///
/// Returns queued readings first (FIFO), then the steady value.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::MockDistance;
/// use rs_junction::traits::DistanceSensor;
///
/// let mut sensor = MockDistance::new(100);
/// sensor.queue(&[5, 7]);
///
/// assert_eq!(sensor.distance_cm().unwrap(), 5);
/// assert_eq!(sensor.distance_cm().unwrap(), 7);
/// assert_eq!(sensor.distance_cm().unwrap(), 100);
/// assert_eq!(sensor.reads, 3);
/// ```
#[derive(Debug, Default)]
pub struct MockDistance {
    steady_cm: u32,
    queued: VecDeque<u32>,
    /// Number of readings taken.
    pub reads: usize,
}

impl MockDistance {
    /// Creates a sensor that reads `cm` until told otherwise.
    pub fn new(cm: u32) -> Self {
        Self {
            steady_cm: cm,
            ..Default::default()
        }
    }

    /// Change the steady reading.
    pub fn set_cm(&mut self, cm: u32) {
        self.steady_cm = cm;
    }

    /// Queue one-off readings.
    pub fn queue(&mut self, readings: &[u32]) {
        self.queued.extend(readings.iter().copied());
    }
}

impl DistanceSensor for MockDistance {
    type Error = Infallible;

    fn distance_cm(&mut self) -> Result<u32, Infallible> {
        self.reads += 1;
        Ok(self.queued.pop_front().unwrap_or(self.steady_cm))
    }
}

/// Mock ambient light sensor.
#[derive(Debug, Default)]
pub struct MockAmbient {
    level: u32,
    /// Number of readings taken.
    pub reads: usize,
}

impl MockAmbient {
    /// Creates a sensor that always reads `level`.
    pub fn new(level: u32) -> Self {
        Self { level, reads: 0 }
    }

    /// Change the reading.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

impl LightSensor for MockAmbient {
    type Error = Infallible;

    fn level(&mut self) -> Result<u32, Infallible> {
        self.reads += 1;
        Ok(self.level)
    }
}

// ============================================================================
// Serial and Button Mocks
// ============================================================================

/// Mock serial port.
///
/// Queue bytes to simulate operator input; written lines are captured both
/// here and as [`Event::Status`] in the timeline.
#[derive(Debug)]
pub struct MockSerial {
    timeline: Timeline,
    /// Bytes waiting to be read.
    pub incoming: VecDeque<u8>,
    /// Lines written so far.
    pub lines: Vec<String>,
}

impl MockSerial {
    /// Creates a port with no pending input.
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            incoming: VecDeque::new(),
            lines: Vec::new(),
        }
    }

    /// Queue input bytes
    pub fn queue_bytes(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }
}

impl SerialPort for MockSerial {
    type Error = Infallible;

    fn read_byte(&mut self) -> Result<Option<u8>, Infallible> {
        Ok(self.incoming.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), Infallible> {
        self.lines.push(line.into());
        self.timeline.push(Event::Status(line.into()));
        Ok(())
    }
}

/// Mock push button.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::{leak_latch, MockButton, Timeline};
/// use rs_junction::traits::PushButton;
///
/// let latch = leak_latch();
/// let mut button = MockButton::new(&Timeline::new());
///
/// // Edges are lost while no interrupt is attached
/// assert!(!button.fire());
///
/// button.attach(latch).unwrap();
/// assert!(button.fire());
/// assert!(latch.is_pressed());
/// ```
#[derive(Debug)]
pub struct MockButton {
    timeline: Timeline,
    latch: Option<&'static ButtonLatch>,
    /// Number of attach calls.
    pub attach_count: usize,
    /// Number of detach calls.
    pub detach_count: usize,
    /// Number of service calls.
    pub service_count: usize,
}

impl MockButton {
    /// Creates a detached button.
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            latch: None,
            attach_count: 0,
            detach_count: 0,
            service_count: 0,
        }
    }

    /// Returns true while an interrupt is attached.
    pub fn is_attached(&self) -> bool {
        self.latch.is_some()
    }

    /// Simulate a falling edge. Returns true if an interrupt handled it.
    pub fn fire(&mut self) -> bool {
        match self.latch {
            Some(latch) => {
                latch.press();
                true
            }
            None => false,
        }
    }
}

impl PushButton for MockButton {
    type Error = Infallible;

    fn attach(&mut self, latch: &'static ButtonLatch) -> Result<(), Infallible> {
        self.latch = Some(latch);
        self.attach_count += 1;
        self.timeline.push(Event::Attach);
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Infallible> {
        self.latch = None;
        self.detach_count += 1;
        self.timeline.push(Event::Detach);
        Ok(())
    }

    fn service(&mut self) -> Result<(), Infallible> {
        self.service_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Platform
// ============================================================================

/// Desktop platform built entirely from mocks.
#[derive(Debug)]
pub struct MockPlatform;

impl Platform for MockPlatform {
    type Error = Infallible;
    type Light = Light<MockPin>;
    type Buzzer = Buzzer<MockTone>;
    type Distance = MockDistance;
    type Ambient = MockAmbient;
    type Serial = MockSerial;
    type Button = MockButton;
    type Delay = MockDelay;
}

/// Allocate a latch that lives for the rest of the process.
///
/// Tests use this instead of a `static` so each gets a fresh latch.
pub fn leak_latch() -> &'static ButtonLatch {
    Box::leak(Box::new(ButtonLatch::new()))
}

/// Build an intersection of mocks recording into `timeline`.
///
/// Sensors start far away (100 cm) and bright (4000).
pub fn mock_intersection(timeline: &Timeline) -> Intersection<MockPlatform> {
    Intersection::new(
        Light::new(MockPin::new(Device::Green, timeline)),
        Light::new(MockPin::new(Device::Yellow, timeline)),
        Light::new(MockPin::new(Device::Red, timeline)),
        Buzzer::new(MockTone::new(timeline)),
        MockDistance::new(100),
        MockAmbient::new(4000),
        MockDelay::new(timeline),
    )
}

/// Build a controller over [`mock_intersection`] with default configuration.
pub fn mock_controller(
    timeline: &Timeline,
    latch: &'static ButtonLatch,
) -> ModeController<MockPlatform> {
    mock_controller_with_config(timeline, latch, Config::default())
}

/// Build a controller over [`mock_intersection`] with `config`.
pub fn mock_controller_with_config(
    timeline: &Timeline,
    latch: &'static ButtonLatch,
    config: Config,
) -> ModeController<MockPlatform> {
    ModeController::new(
        mock_intersection(timeline),
        MockSerial::new(timeline),
        MockButton::new(timeline),
        latch,
        config,
    )
}

// ============================================================================
// Tests
// ============================================================================
