//! ESP32 hardware backend.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (classic, eight low-speed LEDC channels)
//! - **Input**: KY-040 rotary encoder with push button
//! - **Outputs**: common-cathode RGB LED, passive piezo buzzer, four hobby servos
//! - **Storage**: default NVS partition
//!
//! # LEDC Allocation
//!
//! | Timer | Frequency | Channels |
//! |-------|-----------|----------|
//! | timer0 | 1 kHz | channel0-2 (red, green, blue) |
//! | timer1 | retuned per note | channel3 (buzzer) |
//! | timer2 | 50 Hz | channel4-7 (servos) |
//!
//! # Pin Assignments
//!
//! See the [`pins`] module.

mod clock;
mod input;
mod nvs;
mod pwm;

pub use clock::Esp32Clock;
pub use input::{pull_up_input, Esp32Input};
pub use nvs::{NvsStore, NvsStoreError};
pub use pwm::{ledc_timer, Esp32Pwm};

/// GPIO assignments.
pub mod pins {
    // =========================================================================
    // RGB LED
    // =========================================================================

    /// Red channel
    pub const LED_RED: i32 = 25;

    /// Green channel
    pub const LED_GREEN: i32 = 26;

    /// Blue channel
    pub const LED_BLUE: i32 = 27;

    // =========================================================================
    // Buzzer
    // =========================================================================

    /// Passive piezo buzzer
    pub const BUZZER: i32 = 14;

    // =========================================================================
    // Rotary Encoder (KY-040)
    // =========================================================================

    /// Encoder clock/A signal
    pub const ENC_CLK: i32 = 32;

    /// Encoder data/B signal
    pub const ENC_DT: i32 = 33;

    /// Encoder push button (active low)
    pub const ENC_SW: i32 = 13;

    // =========================================================================
    // Servos
    // =========================================================================

    /// Servo signal lines, in bank order
    pub const SERVOS: [i32; 4] = [16, 17, 18, 19];
}
