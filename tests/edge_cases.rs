//! Edge case and boundary condition tests for the intersection controller

use proptest::prelude::*;
use rs_junction::hal::{
    leak_latch, mock_controller, mock_intersection, Device, Event, MockClock, MockDelay,
    MockEcho, Timeline,
};
use rs_junction::{
    Clock, Config, DistanceSensor, Mode, OutputDevice, SelectOutcome, SensorConfig, ThresholdConfig,
    Ultrasonic,
};

fn invalid_byte() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("mode code", |b| Mode::from_code(*b).is_none())
}

// ============================================================================
// Input Validation
// ============================================================================

proptest! {
    #[test]
    fn invalid_bytes_never_change_anything(
        start in 0usize..4,
        bytes in prop::collection::vec(invalid_byte(), 1..32),
    ) {
        let timeline = Timeline::new();
        let mut controller = mock_controller(&timeline, leak_latch());
        let mode = Mode::ALL[start];
        controller.select(mode.code()).unwrap();
        let armed = controller.is_button_armed();
        timeline.clear();

        for byte in bytes {
            let outcome = controller.select(byte).unwrap();
            prop_assert_eq!(outcome, SelectOutcome::Ignored { code: byte });
        }

        prop_assert_eq!(controller.mode(), mode);
        prop_assert_eq!(controller.is_button_armed(), armed);
        prop_assert!(timeline.is_empty());
    }

    #[test]
    fn any_byte_step_keeps_a_single_status_line(byte in any::<u8>()) {
        let timeline = Timeline::new();
        let mut controller = mock_controller(&timeline, leak_latch());
        controller.serial_mut().queue_bytes(&[byte]);
        controller.step().unwrap();

        let expected = Mode::from_code(byte).unwrap_or(Mode::Regular);
        prop_assert_eq!(controller.mode(), expected);
        prop_assert_eq!(timeline.statuses(), vec![format!("MODE: {expected}")]);
    }
}

#[test]
fn codes_around_the_valid_range_are_ignored() {
    for byte in [b'0', b'5', b'\r', b'\n', 0, 0xff] {
        assert_eq!(Mode::from_code(byte), None, "byte {byte}");
    }
}

#[test]
fn invalid_byte_consumes_the_iteration() {
    let timeline = Timeline::new();
    let mut controller = mock_controller(&timeline, leak_latch());
    controller.serial_mut().queue_bytes(b"\n2");

    assert_eq!(
        controller.step().unwrap(),
        SelectOutcome::Ignored { code: b'\n' }
    );
    assert_eq!(controller.mode(), Mode::Regular);

    assert!(controller.step().unwrap().is_changed());
    assert_eq!(controller.mode(), Mode::Pedestrian);
}

// ============================================================================
// Threshold Boundaries
// ============================================================================

#[test]
fn distance_threshold_is_strict() {
    let timeline = Timeline::new();
    let mut junction = mock_intersection(&timeline);

    junction.distance.set_cm(10);
    junction.run_pedestrian().unwrap();
    assert_eq!(timeline.count(&Event::on(Device::Buzzer)), 0);

    junction.distance.set_cm(9);
    junction.run_pedestrian().unwrap();
    assert_eq!(timeline.count(&Event::on(Device::Buzzer)), 1);
}

#[test]
fn light_threshold_is_strict() {
    let timeline = Timeline::new();
    let mut junction = mock_intersection(&timeline);
    junction.distance.set_cm(50);

    junction.ambient.set_level(3000);
    junction.run_night().unwrap();
    assert!(!junction.red.is_on());
    assert_eq!(junction.distance.reads, 0);

    junction.ambient.set_level(2999);
    junction.run_night().unwrap();
    assert!(junction.red.is_on());
    assert_eq!(junction.distance.reads, 1);
}

#[test]
fn custom_thresholds_from_config() {
    let timeline = Timeline::new();
    let config = Config::default().with_thresholds(
        ThresholdConfig::default()
            .with_near_cm(200)
            .with_dark_level(5001),
    );
    let mut controller =
        rs_junction::hal::mock_controller_with_config(&timeline, leak_latch(), config);

    controller.select(b'3').unwrap();
    controller.step().unwrap();

    // Always dark, and 100cm counts as near
    assert!(controller.intersection().green.is_on());
}

// ============================================================================
// Sensor Timeout
// ============================================================================

#[test]
fn echo_timeout_reads_as_object_in_range() {
    let timeline = Timeline::new();
    let clock = MockClock::new();
    let echo = MockEcho::new(&clock, &timeline);
    let delay = MockDelay::new(&timeline).with_clock(&clock);
    let config = SensorConfig::default().with_echo_timeout_us(2_000);

    let mut ranger = Ultrasonic::with_config(echo, delay, clock.clone(), &config);
    assert_eq!(ranger.distance_cm().unwrap(), 0);
    assert!(clock.now_us() >= 2_000);
    assert!(ThresholdConfig::default().is_near(0));
}

#[test]
fn repeated_readings_retrigger() {
    let timeline = Timeline::new();
    let clock = MockClock::new();
    let echo = MockEcho::new(&clock, &timeline).with_pulse(20, 1740);
    let delay = MockDelay::new(&timeline).with_clock(&clock);

    let mut ranger = Ultrasonic::new(echo, delay, clock);
    assert_eq!(ranger.distance_cm().unwrap(), 30);
    assert_eq!(ranger.distance_cm().unwrap(), 30);
    assert_eq!(ranger.pins().pings, 2);
}
