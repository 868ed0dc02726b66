//! Mode-selection controller that ties everything together.
//!
//! This module provides [`ModeController`], the central component that reads
//! mode codes from the serial link, performs the bookkeeping for a mode
//! change and runs the active mode handler.
//!
//! # Overview
//!
//! One call to [`ModeController::step`] is one pass of the main loop:
//! - Read at most one byte and apply the transition rule ([`select`](ModeController::select))
//! - Keep the button interrupt armed while Manual is active
//! - Write `MODE: <name>` and run the handler ([`dispatch`](ModeController::dispatch))
//!
//! # Example
//!
//! ```rust
//! use rs_junction::hal::{leak_latch, mock_controller, Timeline};
//! use rs_junction::{Mode, SelectOutcome};
//!
//! let timeline = Timeline::new();
//! let mut controller = mock_controller(&timeline, leak_latch());
//!
//! // Nothing received yet: Regular runs
//! assert_eq!(controller.step().unwrap(), SelectOutcome::NoInput);
//! assert_eq!(timeline.statuses(), vec!["MODE: Regular"]);
//!
//! // Switch to Night
//! controller.serial_mut().queue_bytes(b"3");
//! let outcome = controller.step().unwrap();
//! assert_eq!(outcome, SelectOutcome::Changed { from: Mode::Regular, to: Mode::Night });
//! assert_eq!(controller.state().iterations, 2);
//! ```

use core::convert::Infallible;

use crate::config::Config;
use crate::handlers::Intersection;
use crate::latch::ButtonLatch;
use crate::mode::Mode;
use crate::traits::{Platform, PushButton, SerialPort};

/// Prefix of every status line.
pub const STATUS_PREFIX: &str = "MODE: ";

/// Status line announcing `mode`, without line ending.
///
/// ```
/// use rs_junction::{controller::status_line, Mode};
///
/// assert_eq!(status_line(Mode::Pedestrian), "MODE: Pedestrian");
/// ```
pub const fn status_line(mode: Mode) -> &'static str {
    match mode {
        Mode::Regular => "MODE: Regular",
        Mode::Pedestrian => "MODE: Pedestrian",
        Mode::Night => "MODE: Night",
        Mode::Manual => "MODE: Manual",
    }
}

/// Result of offering one input byte to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectOutcome {
    /// No byte was available.
    NoInput,
    /// Byte is not a mode code; dropped.
    Ignored {
        /// The byte received.
        code: u8,
    },
    /// Code selects the mode already active; nothing reset.
    Unchanged(Mode),
    /// Mode switched.
    Changed {
        /// Mode before the switch.
        from: Mode,
        /// Mode now active.
        to: Mode,
    },
}

impl SelectOutcome {
    /// Returns true if the active mode changed.
    pub fn is_changed(&self) -> bool {
        matches!(self, SelectOutcome::Changed { .. })
    }
}

/// Main mode controller.
///
/// Owns the intersection devices, the serial port and the push button. The
/// button latch is shared with interrupt context and therefore `'static`.
///
/// # Type Parameter
///
/// - `H`: The board's [`Platform`] bundle
pub struct ModeController<H: Platform> {
    intersection: Intersection<H>,
    serial: H::Serial,
    button: H::Button,
    latch: &'static ButtonLatch,
    mode: Mode,
    button_armed: bool,
    iterations: u64,
    config: Config,
}

impl<H: Platform> ModeController<H> {
    /// Create a controller in Regular mode with the button interrupt detached.
    ///
    /// Timing and thresholds from `config` are applied to `intersection`.
    pub fn new(
        intersection: Intersection<H>,
        serial: H::Serial,
        button: H::Button,
        latch: &'static ButtonLatch,
        config: Config,
    ) -> Self {
        let intersection = intersection
            .with_timing(config.timing.clone())
            .with_thresholds(config.thresholds.clone());
        Self {
            intersection,
            serial,
            button,
            latch,
            mode: Mode::default(),
            button_armed: false,
            iterations: 0,
            config,
        }
    }

    /// Apply the transition rule to one received byte.
    ///
    /// A legal code that differs from the active mode switches all lamps
    /// off, arms or disarms the button interrupt and commits the new mode.
    /// Anything else leaves every device untouched.
    pub fn select(&mut self, code: u8) -> Result<SelectOutcome, H::Error> {
        let Some(to) = Mode::from_code(code) else {
            log::debug!("ignoring byte 0x{code:02x}");
            return Ok(SelectOutcome::Ignored { code });
        };

        let from = self.mode;
        if to == from {
            log::debug!("mode {to} already active");
            return Ok(SelectOutcome::Unchanged(to));
        }

        self.intersection.all_lights_off()?;

        if to.uses_button() && !self.button_armed {
            self.button.attach(self.latch)?;
            self.button_armed = true;
            log::debug!("button interrupt armed");
        } else if from.uses_button() && !to.uses_button() && self.button_armed {
            self.button.detach()?;
            self.button_armed = false;
            log::debug!("button interrupt disarmed");
        }

        self.mode = to;
        log::info!("mode {from} -> {to}");
        Ok(SelectOutcome::Changed { from, to })
    }

    /// Read at most one byte from the serial port and [`select`](Self::select) it.
    pub fn poll_input(&mut self) -> Result<SelectOutcome, H::Error> {
        match self.serial.read_byte()? {
            Some(code) => self.select(code),
            None => Ok(SelectOutcome::NoInput),
        }
    }

    /// Write the status line and run the active mode's handler to completion.
    pub fn dispatch(&mut self) -> Result<(), H::Error> {
        self.serial.write_line(status_line(self.mode))?;
        match self.mode {
            Mode::Regular => self.intersection.run_regular(),
            Mode::Pedestrian => self.intersection.run_pedestrian(),
            Mode::Night => self.intersection.run_night(),
            Mode::Manual => self.intersection.run_manual(self.latch),
        }
    }

    /// One full loop iteration: poll, service the button, dispatch.
    pub fn step(&mut self) -> Result<SelectOutcome, H::Error> {
        let outcome = self.poll_input()?;
        if self.button_armed {
            self.button.service()?;
        }
        self.dispatch()?;
        self.iterations += 1;
        Ok(outcome)
    }

    /// Loop forever. Returns only when a device reports an error.
    pub fn run(&mut self) -> Result<Infallible, H::Error> {
        log::info!("{} running in mode {}", self.config.device.name, self.mode);
        loop {
            self.step()?;
        }
    }

    /// Get the current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check if the button interrupt is attached
    pub fn is_button_armed(&self) -> bool {
        self.button_armed
    }

    /// Get the button latch shared with the interrupt
    pub fn latch(&self) -> &'static ButtonLatch {
        self.latch
    }

    /// Get the configuration this controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the intersection devices.
    pub fn intersection(&self) -> &Intersection<H> {
        &self.intersection
    }

    /// Mutably borrow the intersection devices.
    pub fn intersection_mut(&mut self) -> &mut Intersection<H> {
        &mut self.intersection
    }

    /// Borrow the serial port.
    pub fn serial(&self) -> &H::Serial {
        &self.serial
    }

    /// Mutably borrow the serial port.
    pub fn serial_mut(&mut self) -> &mut H::Serial {
        &mut self.serial
    }

    /// Borrow the push button.
    pub fn button(&self) -> &H::Button {
        &self.button
    }

    /// Mutably borrow the push button.
    pub fn button_mut(&mut self) -> &mut H::Button {
        &mut self.button
    }

    /// Get the current state for logs and simulators
    pub fn state(&self) -> ControllerState {
        ControllerState {
            mode: self.mode,
            button_armed: self.button_armed,
            button_pending: self.latch.is_pressed(),
            iterations: self.iterations,
        }
    }
}

/// Controller state snapshot.
///
/// # Example
///
/// ```rust
/// use rs_junction::hal::{leak_latch, mock_controller, Timeline};
/// use rs_junction::Mode;
///
/// let controller = mock_controller(&Timeline::new(), leak_latch());
///
/// let state = controller.state();
/// assert_eq!(state.mode, Mode::Regular);
/// assert!(!state.button_armed);
/// assert_eq!(state.iterations, 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerState {
    /// Active mode.
    pub mode: Mode,
    /// Whether the button interrupt is attached.
    pub button_armed: bool,
    /// Whether a button press is waiting to be handled.
    pub button_pending: bool,
    /// Completed loop iterations.
    pub iterations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::{leak_latch, mock_controller, Device, Event, MockPlatform, Timeline};
    use crate::traits::OutputDevice;

    fn setup() -> (ModeController<MockPlatform>, Timeline) {
        let timeline = Timeline::new();
        (mock_controller(&timeline, leak_latch()), timeline)
    }

    #[test]
    fn starts_in_regular() {
        let (controller, timeline) = setup();
        assert_eq!(controller.mode(), Mode::Regular);
        assert!(!controller.is_button_armed());
        assert!(timeline.is_empty());
    }

    #[test]
    fn status_lines_share_prefix() {
        for mode in Mode::ALL {
            let line = status_line(mode);
            assert!(line.starts_with(STATUS_PREFIX));
            assert_eq!(&line[STATUS_PREFIX.len()..], mode.as_str());
        }
    }

    #[test]
    fn select_invalid_byte_touches_nothing() {
        let (mut controller, timeline) = setup();
        assert_eq!(
            controller.select(b'x').unwrap(),
            SelectOutcome::Ignored { code: b'x' }
        );
        assert_eq!(controller.mode(), Mode::Regular);
        assert!(timeline.is_empty());
    }

    #[test]
    fn select_same_mode_touches_nothing() {
        let (mut controller, timeline) = setup();
        assert_eq!(
            controller.select(b'1').unwrap(),
            SelectOutcome::Unchanged(Mode::Regular)
        );
        assert!(timeline.is_empty());
    }

    #[test]
    fn select_change_switches_lights_off() {
        let (mut controller, timeline) = setup();
        controller.intersection_mut().yellow.on().unwrap();
        controller.intersection_mut().buzzer.on().unwrap();
        timeline.clear();

        let outcome = controller.select(b'2').unwrap();
        assert!(outcome.is_changed());
        assert_eq!(controller.mode(), Mode::Pedestrian);
        assert_eq!(
            timeline.events(),
            vec![
                Event::off(Device::Red),
                Event::off(Device::Green),
                Event::off(Device::Yellow),
            ]
        );
        assert!(controller.intersection().buzzer.is_on());
    }

    #[test]
    fn manual_arms_and_disarms_button() {
        let (mut controller, timeline) = setup();

        controller.select(b'4').unwrap();
        assert!(controller.is_button_armed());
        assert_eq!(controller.button().attach_count, 1);
        assert_eq!(timeline.since(3), vec![Event::Attach]);

        controller.select(b'1').unwrap();
        assert!(!controller.is_button_armed());
        assert_eq!(controller.button().detach_count, 1);
        assert_eq!(timeline.events().last(), Some(&Event::Detach));
    }

    #[test]
    fn switching_between_other_modes_leaves_button_alone() {
        let (mut controller, _) = setup();
        controller.select(b'2').unwrap();
        controller.select(b'3').unwrap();
        controller.select(b'1').unwrap();

        assert_eq!(controller.button().attach_count, 0);
        assert_eq!(controller.button().detach_count, 0);
    }

    #[test]
    fn poll_reads_one_byte_per_call() {
        let (mut controller, _) = setup();
        controller.serial_mut().queue_bytes(b"23");

        assert_eq!(
            controller.poll_input().unwrap(),
            SelectOutcome::Changed {
                from: Mode::Regular,
                to: Mode::Pedestrian
            }
        );
        assert_eq!(controller.serial().incoming.len(), 1);
        assert!(controller.poll_input().unwrap().is_changed());
        assert_eq!(controller.poll_input().unwrap(), SelectOutcome::NoInput);
        assert_eq!(controller.mode(), Mode::Night);
    }

    #[test]
    fn dispatch_writes_status_before_handler() {
        let (mut controller, timeline) = setup();
        controller.dispatch().unwrap();

        let events = timeline.events();
        assert_eq!(events[0], Event::Status("MODE: Regular".into()));
        assert_eq!(events[1], Event::on(Device::Red));
    }

    #[test]
    fn step_services_button_only_while_armed() {
        let (mut controller, _) = setup();
        controller.step().unwrap();
        assert_eq!(controller.button().service_count, 0);

        controller.serial_mut().queue_bytes(b"4");
        controller.step().unwrap();
        controller.step().unwrap();
        assert_eq!(controller.button().service_count, 2);
    }

    #[test]
    fn state_tracks_pending_press() {
        let (mut controller, _) = setup();
        controller.select(b'4').unwrap();
        controller.button_mut().fire();

        let state = controller.state();
        assert_eq!(state.mode, Mode::Manual);
        assert!(state.button_armed);
        assert!(state.button_pending);

        controller.step().unwrap();
        assert!(!controller.state().button_pending);
        assert_eq!(controller.state().iterations, 1);
    }

    #[test]
    fn config_timing_reaches_handlers() {
        let timeline = Timeline::new();
        let config = Config::default()
            .with_timing(crate::config::TimingConfig::default().with_cycle_ms(4, 2, 4));
        let mut controller =
            crate::hal::mock::mock_controller_with_config(&timeline, leak_latch(), config);

        controller.step().unwrap();
        assert_eq!(timeline.total_wait_ms(), 12);
        assert_eq!(controller.config().timing.red_ms, 4);
    }
}
