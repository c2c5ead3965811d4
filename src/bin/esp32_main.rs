//! ESP32 rotary-encoder RGB panel.
//!
//! This is the main entry point for the physical hardware. It runs a 1 kHz
//! control loop that:
//! - Samples the encoder every tick and the push button every 10 ms
//! - Steps color fades and buzzer melodies
//! - Mirrors the encoder count onto the four servos
//!
//! Mode, color, intensity and power are kept in NVS across restarts.
//!
//! The loop yields to FreeRTOS between ticks. `sdkconfig.defaults` raises
//! the FreeRTOS tick rate to 1 kHz so a 1 ms delay really blocks instead
//! of spinning.
//!
//! # Hardware Setup
//!
//! See [`rs_rgbknob::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/xtensa-esp32-espidf/release/esp32_main
//! ```

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::IOPin;
use esp_idf_hal::ledc::{LedcDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use rs_rgbknob::hal::esp32::{ledc_timer, pull_up_input, Esp32Clock, Esp32Pwm, NvsStore};
use rs_rgbknob::servo::SWEEP_INTERVAL_MS;
use rs_rgbknob::traits::Clock;
use rs_rgbknob::{Buzzer, Panel, PanelConfig, PanelRunner, RgbLed, ServoBank, ServoSweep};

/// Servo self-test sweep, in pulse milliseconds.
const SELF_TEST_SWEEP: (f32, f32, f32) = (1.0, 2.0, 0.1);

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-rgbknob Panel Controller");
    println!("================================");
    println!();

    let config = PanelConfig::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let ledc = peripherals.ledc;
    let pins = peripherals.pins;

    // =========================================================================
    // RGB LED (GPIO25/26/27, LEDC timer0)
    // =========================================================================
    let led_hz = config.pwm.led_hz;
    let led_timer = ledc_timer(ledc.timer0, led_hz, Resolution::Bits10)?;
    let led = RgbLed::new(
        Esp32Pwm::on_shared_timer(LedcDriver::new(ledc.channel0, &led_timer, pins.gpio25)?, led_hz),
        Esp32Pwm::on_shared_timer(LedcDriver::new(ledc.channel1, &led_timer, pins.gpio26)?, led_hz),
        Esp32Pwm::on_shared_timer(LedcDriver::new(ledc.channel2, &led_timer, pins.gpio27)?, led_hz),
        led_hz,
    )?;
    println!("[OK] RGB LED initialized (GPIO25/26/27 PWM)");

    // =========================================================================
    // Buzzer (GPIO14, LEDC timer1 retuned per note)
    // =========================================================================
    let buzzer_timer = ledc_timer(ledc.timer1, led_hz, Resolution::Bits10)?;
    let buzzer_channel = LedcDriver::new(ledc.channel3, &buzzer_timer, pins.gpio14)?;
    let buzzer = Buzzer::new(
        Esp32Pwm::with_own_timer(buzzer_channel, buzzer_timer, led_hz),
        config.tones.duty,
    )?;
    println!("[OK] Buzzer initialized (GPIO14 PWM)");

    // =========================================================================
    // Settings (NVS)
    // =========================================================================
    let store = NvsStore::new(EspDefaultNvsPartition::take()?)?;
    println!("[OK] Settings store opened (NVS)");

    // =========================================================================
    // Encoder (KY-040 on GPIO32/33/13)
    // =========================================================================
    let clk = pull_up_input(pins.gpio32.downgrade())?;
    let dt = pull_up_input(pins.gpio33.downgrade())?;
    let sw = pull_up_input(pins.gpio13.downgrade())?;
    println!("[OK] Encoder initialized (GPIO32/33/13)");

    // =========================================================================
    // Servos (GPIO16-19, LEDC timer2 at 50 Hz)
    // =========================================================================
    let servo_hz = config.pwm.servo_hz;
    let servo_timer = ledc_timer(ledc.timer2, servo_hz, Resolution::Bits14)?;
    let mut servos = ServoBank::new(
        [
            LedcDriver::new(ledc.channel4, &servo_timer, pins.gpio16)?,
            LedcDriver::new(ledc.channel5, &servo_timer, pins.gpio17)?,
            LedcDriver::new(ledc.channel6, &servo_timer, pins.gpio18)?,
            LedcDriver::new(ledc.channel7, &servo_timer, pins.gpio19)?,
        ]
        .map(|driver| Esp32Pwm::on_shared_timer(driver, servo_hz)),
        servo_hz,
    )?;
    servos.init()?;
    println!("[OK] Servos initialized (GPIO16/17/18/19 PWM)");

    let (start, end, step) = SELF_TEST_SWEEP;
    for pulse_ms in ServoSweep::new(start, end, step) {
        servos.set_all(pulse_ms)?;
        FreeRtos::delay_ms(SWEEP_INTERVAL_MS);
    }
    println!("[OK] Servo sweep complete");

    // =========================================================================
    // Panel
    // =========================================================================
    let clock = Esp32Clock::new();
    let panel = Panel::new(led, buzzer, store, config.clone())?;
    let mut runner = PanelRunner::new(panel, clk, dt, sw, &config, clock.now_ms());

    let state = runner.panel().state();
    println!(
        "[OK] Panel ready: {:?} mode, color {}, intensity {}, {:?}",
        state.mode, state.color_index, state.intensity, state.power
    );
    println!();

    // =========================================================================
    // Main Loop
    // =========================================================================
    let mut last_position = runner.encoder().position();
    servos.set_all(ServoBank::<Esp32Pwm>::position_for_count(last_position))?;

    loop {
        runner.tick(clock.now_ms())?;

        let position = runner.encoder().position();
        if position != last_position {
            last_position = position;
            servos.set_all(ServoBank::<Esp32Pwm>::position_for_count(position))?;
            log::debug!("encoder at {}", position);
        }

        // Block until the next sample is due. Always at least one FreeRTOS
        // tick (1 ms with sdkconfig.defaults) so the idle task gets to run.
        let wait_ms = runner.next_due_ms().saturating_sub(clock.now_ms()).max(1);
        FreeRtos::delay_ms(u32::try_from(wait_ms).unwrap_or(u32::MAX));
    }
}
