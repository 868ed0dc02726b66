//! Integration tests for the mode controller

use rs_junction::hal::{
    leak_latch, mock_controller, Device, Event, MockPlatform, Timeline,
};
use rs_junction::{ButtonLatch, Mode, ModeController, OutputDevice, SelectOutcome};

use Device::{Buzzer, Green, Red, Yellow};

fn setup() -> (ModeController<MockPlatform>, Timeline, &'static ButtonLatch) {
    let timeline = Timeline::new();
    let latch = leak_latch();
    (mock_controller(&timeline, latch), timeline, latch)
}

fn status(mode: Mode) -> Event {
    Event::Status(format!("MODE: {mode}"))
}

fn regular_cycle() -> Vec<Event> {
    vec![
        Event::on(Red),
        Event::wait(2000),
        Event::off(Red),
        Event::on(Yellow),
        Event::wait(1000),
        Event::off(Yellow),
        Event::on(Green),
        Event::wait(2000),
        Event::off(Green),
        Event::on(Yellow),
        Event::wait(1000),
        Event::off(Yellow),
    ]
}

fn alarm() -> Vec<Event> {
    vec![
        Event::off(Green),
        Event::on(Yellow),
        Event::wait(1000),
        Event::off(Yellow),
        Event::on(Buzzer),
        Event::on(Red),
        Event::wait(10_000),
        Event::off(Buzzer),
        Event::off(Red),
        Event::on(Yellow),
        Event::wait(1000),
        Event::off(Yellow),
    ]
}

fn lights_off() -> Vec<Event> {
    vec![Event::off(Red), Event::off(Green), Event::off(Yellow)]
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn regular_code_then_silence_repeats_regular() {
    let (mut controller, timeline, _) = setup();
    controller.serial_mut().queue_bytes(b"1");

    for _ in 0..3 {
        controller.step().unwrap();
    }

    let mut expected = Vec::new();
    for _ in 0..3 {
        expected.push(status(Mode::Regular));
        expected.extend(regular_cycle());
    }
    assert_eq!(timeline.events(), expected);
    assert_eq!(timeline.total_wait_ms(), 18_000);
}

#[test]
fn manual_button_alarm_then_idle() {
    let (mut controller, timeline, latch) = setup();

    // Enter Manual: lamps off, interrupt armed, green held
    controller.serial_mut().queue_bytes(b"4");
    controller.step().unwrap();
    let mut expected = lights_off();
    expected.extend([Event::Attach, status(Mode::Manual), Event::on(Green)]);
    assert_eq!(timeline.events(), expected);

    // Press during the idle period
    assert!(controller.button_mut().fire());
    assert!(latch.is_pressed());

    let mark = timeline.len();
    controller.step().unwrap();
    let mut expected = vec![status(Mode::Manual)];
    expected.extend(alarm());
    assert_eq!(timeline.since(mark), expected);
    assert!(!latch.is_pressed());

    // No further press: green again
    let mark = timeline.len();
    controller.step().unwrap();
    assert_eq!(
        timeline.since(mark),
        vec![status(Mode::Manual), Event::on(Green)]
    );
    assert!(controller.intersection().green.is_on());
}

#[test]
fn presses_during_alarm_are_absorbed() {
    let (mut controller, _, latch) = setup();
    controller.select(b'4').unwrap();

    controller.button_mut().fire();
    controller.button_mut().fire();
    controller.step().unwrap();

    assert!(!latch.is_pressed());
}

// ============================================================================
// Transition Rule
// ============================================================================

#[test]
fn first_valid_code_selects_mode() {
    let (mut controller, _, _) = setup();
    controller.serial_mut().queue_bytes(b"3");

    let outcome = controller.step().unwrap();
    assert_eq!(
        outcome,
        SelectOutcome::Changed {
            from: Mode::Regular,
            to: Mode::Night
        }
    );
    assert_eq!(controller.serial().lines, vec!["MODE: Night".to_string()]);
}

#[test]
fn repeated_code_keeps_lights_and_button() {
    let (mut controller, timeline, _) = setup();
    controller.select(b'4').unwrap();
    controller.step().unwrap();
    assert!(controller.intersection().green.is_on());

    let mark = timeline.len();
    controller.serial_mut().queue_bytes(b"4");
    let outcome = controller.step().unwrap();

    assert_eq!(outcome, SelectOutcome::Unchanged(Mode::Manual));
    // Handler still runs, nothing is reset
    assert_eq!(
        timeline.since(mark),
        vec![status(Mode::Manual), Event::on(Green)]
    );
    assert_eq!(controller.button().attach_count, 1);
}

#[test]
fn manual_attach_detach_counts() {
    let (mut controller, timeline, _) = setup();

    controller.serial_mut().queue_bytes(b"44142434");
    for _ in 0..8 {
        controller.step().unwrap();
    }

    // Entered Manual four times, left it three times
    assert_eq!(controller.button().attach_count, 4);
    assert_eq!(controller.button().detach_count, 3);
    assert_eq!(timeline.count(&Event::Attach), 4);
    assert_eq!(timeline.count(&Event::Detach), 3);
    assert!(controller.is_button_armed());
}

#[test]
fn button_dead_outside_manual() {
    let (mut controller, _, latch) = setup();
    controller.select(b'4').unwrap();
    controller.select(b'2').unwrap();

    assert!(!controller.button_mut().fire());
    assert!(!latch.is_pressed());
}

#[test]
fn mode_change_clears_lamps_left_by_night() {
    let (mut controller, timeline, _) = setup();
    controller.intersection_mut().ambient.set_level(500);

    controller.serial_mut().queue_bytes(b"3");
    controller.step().unwrap();
    assert!(controller.intersection().red.is_on());

    let mark = timeline.len();
    controller.serial_mut().queue_bytes(b"1");
    controller.step().unwrap();

    let mut expected = lights_off();
    expected.push(status(Mode::Regular));
    expected.extend(regular_cycle());
    assert_eq!(timeline.since(mark), expected);
}

#[test]
fn one_byte_per_iteration() {
    let (mut controller, _, _) = setup();
    controller.serial_mut().queue_bytes(b"234");

    controller.step().unwrap();
    assert_eq!(controller.mode(), Mode::Pedestrian);
    controller.step().unwrap();
    assert_eq!(controller.mode(), Mode::Night);
    controller.step().unwrap();
    assert_eq!(controller.mode(), Mode::Manual);
    assert_eq!(controller.state().iterations, 3);
}

// ============================================================================
// Handlers Through The Controller
// ============================================================================

#[test]
fn pedestrian_near_then_far() {
    let (mut controller, timeline, _) = setup();
    controller.intersection_mut().distance.queue(&[4]);
    controller.serial_mut().queue_bytes(b"2");

    controller.step().unwrap();
    assert_eq!(timeline.count(&Event::on(Yellow)), 10);
    assert_eq!(timeline.count(&Event::on(Buzzer)), 1);
    assert!(!controller.intersection().buzzer.is_on());

    let mark = timeline.len();
    controller.step().unwrap();
    let mut expected = vec![status(Mode::Pedestrian)];
    expected.extend(regular_cycle());
    expected.push(Event::off(Buzzer));
    assert_eq!(timeline.since(mark), expected);
}

#[test]
fn night_follows_sensors() {
    let (mut controller, timeline, _) = setup();
    controller.select(b'3').unwrap();

    // Dark, nobody near: red
    controller.intersection_mut().ambient.set_level(1000);
    controller.intersection_mut().distance.set_cm(80);
    controller.step().unwrap();
    assert!(controller.intersection().red.is_on());
    assert!(!controller.intersection().green.is_on());

    // Dark, car approaching: green
    controller.intersection_mut().distance.set_cm(3);
    controller.step().unwrap();
    assert!(controller.intersection().green.is_on());
    assert!(!controller.intersection().red.is_on());

    // Daylight: Regular cycle
    controller.intersection_mut().ambient.set_level(4500);
    let mark = timeline.len();
    controller.step().unwrap();
    let mut expected = vec![status(Mode::Night), Event::off(Green), Event::off(Red)];
    expected.extend(regular_cycle());
    assert_eq!(timeline.since(mark), expected);
}
