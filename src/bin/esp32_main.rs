//! ESP32-C3 SuperMini traffic intersection controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs the mode loop that:
//! - Reads one mode code per iteration from UART1
//! - Switches lamps off and arms/disarms the crossing button on a mode change
//! - Prints `MODE: <name>` and runs the mode's light sequence
//!
//! # Hardware Setup
//!
//! See [`rs_junction::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --bin esp32_main --features esp32
//!
//! # Custom device name
//! JUNCTION_NAME=north-gate cargo build --release --bin esp32_main --features esp32
//! ```

use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{IOPin, InputPin, OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use rs_junction::hal::esp32::{
    pins, Esp32Button, Esp32Clock, Esp32Echo, Esp32Lamp, Esp32LightAdc, Esp32Platform,
    Esp32Serial, Esp32Tone,
};
use rs_junction::{
    Buzzer, ButtonLatch, Config, DeviceConfig, Intersection, Light, ModeController,
    Photoresistor, Ultrasonic,
};
use std::thread;
use std::time::Duration;

/// Pause between loop iterations in milliseconds
const LOOP_INTERVAL_MS: u64 = 20;

/// Set from interrupt context while Manual mode is active
static LATCH: ButtonLatch = ButtonLatch::new();

fn lamp(pin: impl OutputPin + 'static) -> anyhow::Result<Esp32Lamp> {
    Ok(Light::new(PinDriver::output(pin.downgrade_output())?))
}

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-junction SuperMini Controller");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default().with_device(
        DeviceConfig::default().with_name(option_env!("JUNCTION_NAME").unwrap_or("rs-junction")),
    );

    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;

    // =========================================================================
    // Initialize Lamps (GPIO5/6/7)
    // =========================================================================
    let green = lamp(gpio.gpio5)?;
    let yellow = lamp(gpio.gpio6)?;
    let red = lamp(gpio.gpio7)?;
    println!(
        "[OK] Lamps initialized (GPIO{}/{}/{})",
        pins::GREEN,
        pins::YELLOW,
        pins::RED
    );

    // =========================================================================
    // Initialize Buzzer (LEDC on GPIO10)
    // =========================================================================
    let tone = Esp32Tone::new(
        gpio.gpio10,
        peripherals.ledc.timer0,
        peripherals.ledc.channel0,
        &config.buzzer,
    )?;
    let buzzer = Buzzer::new(tone);
    println!(
        "[OK] Buzzer initialized (GPIO{}, {}Hz)",
        pins::BUZZER,
        config.buzzer.frequency_hz
    );

    // =========================================================================
    // Initialize Ranger (HC-SR04 on GPIO3/4)
    // =========================================================================
    let echo = Esp32Echo::new(
        gpio.gpio3.downgrade_output(),
        gpio.gpio4.downgrade_input(),
    )?;
    let ranger = Ultrasonic::with_config(echo, Ets, Esp32Clock::new(), &config.sensor);
    println!(
        "[OK] Ranger initialized (GPIO{}/{}, timeout {}us)",
        pins::TRIG,
        pins::ECHO,
        ranger.timeout_us()
    );

    // =========================================================================
    // Initialize Light Sensor (ADC1 on GPIO0)
    // =========================================================================
    let ldr = Photoresistor::new(Esp32LightAdc::new(peripherals.adc1, gpio.gpio0)?);
    println!("[OK] Light sensor initialized (GPIO{} ADC)", pins::LDR);

    // =========================================================================
    // Initialize Serial Link (UART1 on GPIO21/20)
    // =========================================================================
    let serial = Esp32Serial::new(
        peripherals.uart1,
        gpio.gpio21,
        gpio.gpio20,
        &config.serial,
    )?;
    println!(
        "[OK] Serial initialized (GPIO{}/{}, {} baud)",
        pins::UART_TX,
        pins::UART_RX,
        config.serial.baud_rate
    );

    // =========================================================================
    // Initialize Button (GPIO1, interrupt attached in Manual mode only)
    // =========================================================================
    let button = Esp32Button::new(gpio.gpio1.downgrade())?;
    println!("[OK] Button initialized (GPIO{})", pins::BUTTON);

    // =========================================================================
    // Initialize Controller
    // =========================================================================
    let intersection: Intersection<Esp32Platform> =
        Intersection::new(green, yellow, red, buzzer, ranger, ldr, FreeRtos);
    let mut controller = ModeController::new(intersection, serial, button, &LATCH, config);

    println!();
    println!("Controls (send over UART1):");
    println!("  1: Regular    2: Pedestrian");
    println!("  3: Night      4: Manual");
    println!();
    println!("Starting mode loop...");
    println!();

    // =========================================================================
    // Main Loop
    // =========================================================================
    loop {
        if let Err(e) = controller.step() {
            log::error!("loop iteration failed: {e:?}");
            return Err(e.into());
        }

        // Yield to the idle task between iterations
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
