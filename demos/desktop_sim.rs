//! Desktop simulator for the intersection controller.
//!
//! Runs the real [`ModeController`] with console lamps, real-time delays and
//! keyboard input standing in for the serial link, sensors and button.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim
//! RUST_LOG=debug cargo run --example desktop_sim
//! ```
//!
//! Type keys followed by Enter:
//!
//! | Key | Effect |
//! |-----|--------|
//! | `1`-`4` | Select Regular / Pedestrian / Night / Manual |
//! | `b` | Press the crossing button (only registers in Manual) |
//! | `n` / `f` | Object near (5cm) / far (100cm) |
//! | `d` / `l` | Dark (1000) / light (4000) |
//! | `q` | Quit |
//!
//! Any other character is passed to the controller as a serial byte and
//! ignored by it.

use std::convert::Infallible;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use rs_junction::{
    Buzzer, ButtonLatch, Config, DigitalOutput, DistanceSensor, Intersection, Light, LightSensor,
    ModeController, Platform, PushButton, SerialPort, ToneOutput,
};

static LATCH: ButtonLatch = ButtonLatch::new();
static BUTTON_ARMED: AtomicBool = AtomicBool::new(false);
static DISTANCE_CM: AtomicU32 = AtomicU32::new(100);
static LIGHT_LEVEL: AtomicU32 = AtomicU32::new(4000);

// =============================================================================
// Simulated devices
// =============================================================================

struct ConsoleLamp(&'static str);

impl DigitalOutput for ConsoleLamp {
    type Error = Infallible;

    fn drive(&mut self, high: bool) -> Result<(), Infallible> {
        println!("    {:<6} {}", self.0, if high { "ON" } else { "off" });
        Ok(())
    }
}

struct ConsoleTone;

impl ToneOutput for ConsoleTone {
    type Error = Infallible;

    fn start_tone(&mut self) -> Result<(), Infallible> {
        println!("    buzzer BEEP");
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), Infallible> {
        println!("    buzzer quiet");
        Ok(())
    }
}

struct SimDistance;

impl DistanceSensor for SimDistance {
    type Error = Infallible;

    fn distance_cm(&mut self) -> Result<u32, Infallible> {
        Ok(DISTANCE_CM.load(Ordering::Relaxed))
    }
}

struct SimAmbient;

impl LightSensor for SimAmbient {
    type Error = Infallible;

    fn level(&mut self) -> Result<u32, Infallible> {
        Ok(LIGHT_LEVEL.load(Ordering::Relaxed))
    }
}

struct SimSerial(Receiver<u8>);

impl SerialPort for SimSerial {
    type Error = Infallible;

    fn read_byte(&mut self) -> Result<Option<u8>, Infallible> {
        Ok(self.0.try_recv().ok())
    }

    fn write_line(&mut self, line: &str) -> Result<(), Infallible> {
        println!("{line}");
        Ok(())
    }
}

struct SimButton;

impl PushButton for SimButton {
    type Error = Infallible;

    fn attach(&mut self, _latch: &'static ButtonLatch) -> Result<(), Infallible> {
        BUTTON_ARMED.store(true, Ordering::Release);
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Infallible> {
        BUTTON_ARMED.store(false, Ordering::Release);
        Ok(())
    }
}

struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

struct DesktopPlatform;

impl Platform for DesktopPlatform {
    type Error = Infallible;
    type Light = Light<ConsoleLamp>;
    type Buzzer = Buzzer<ConsoleTone>;
    type Distance = SimDistance;
    type Ambient = SimAmbient;
    type Serial = SimSerial;
    type Button = SimButton;
    type Delay = SleepDelay;
}

// =============================================================================
// Keyboard
// =============================================================================

/// Forward keyboard input; sensor and button keys are handled here so they
/// take effect even while a handler is blocking.
fn spawn_keyboard(tx: mpsc::Sender<u8>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            for byte in line.bytes() {
                match byte {
                    b'b' => {
                        if BUTTON_ARMED.load(Ordering::Acquire) {
                            LATCH.press();
                            println!("  (button pressed)");
                        } else {
                            println!("  (button ignored, not in Manual)");
                        }
                    }
                    b'n' => DISTANCE_CM.store(5, Ordering::Relaxed),
                    b'f' => DISTANCE_CM.store(100, Ordering::Relaxed),
                    b'd' => LIGHT_LEVEL.store(1000, Ordering::Relaxed),
                    b'l' => LIGHT_LEVEL.store(4000, Ordering::Relaxed),
                    b'q' => std::process::exit(0),
                    b' ' | b'\t' => {}
                    other => {
                        if tx.send(other).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    });
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=================================");
    println!("  rs-junction Desktop Simulator");
    println!("=================================");
    println!();
    println!("Keys: 1-4 mode, b button, n/f near/far, d/l dark/light, q quit");
    println!();

    let (tx, rx) = mpsc::channel();
    spawn_keyboard(tx);

    let intersection: Intersection<DesktopPlatform> = Intersection::new(
        Light::new(ConsoleLamp("green")),
        Light::new(ConsoleLamp("yellow")),
        Light::new(ConsoleLamp("red")),
        Buzzer::new(ConsoleTone),
        SimDistance,
        SimAmbient,
        SleepDelay,
    );
    let mut controller =
        ModeController::new(intersection, SimSerial(rx), SimButton, &LATCH, Config::default());

    loop {
        let outcome = match controller.step() {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        };
        log::debug!("{outcome:?} -> {:?}", controller.state());

        // Night and idle Manual return immediately; don't spin
        thread::sleep(Duration::from_millis(500));
    }
}
