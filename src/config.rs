//! Panel configuration: cadences, thresholds, step counts and tones.
//!
//! Every timing constant is configurable; the defaults are the documented
//! firmware values.
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::config::{PanelConfig, TimingConfig, InteractionConfig};
//!
//! // Use defaults
//! let config = PanelConfig::default();
//! assert_eq!(config.timing.debounce_ms, 50);
//!
//! // Or customize
//! let config = PanelConfig::default()
//!     .with_timing(TimingConfig::default().with_long_press_ms(800))
//!     .with_interaction(InteractionConfig::default().with_steps_per_color(8));
//! assert!(config.validate().is_ok());
//! ```

use crate::color::Palette;
use crate::encoder::{DirectionConvention, EdgeFilter};
use crate::error::PanelError;
use crate::tone::{NOTE_C5, NOTE_E5, NOTE_G5};

// ============================================================================
// Main Config
// ============================================================================

/// Complete panel configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelConfig {
    /// Sampling cadences and gesture thresholds
    pub timing: TimingConfig,
    /// Rotation step sizes and fades
    pub interaction: InteractionConfig,
    /// Encoder decoding calibration
    pub encoder: EncoderConfig,
    /// Buzzer feedback
    pub tones: ToneConfig,
    /// Push-button wiring
    pub button: ButtonConfig,
    /// PWM carrier frequencies
    pub pwm: PwmConfig,
    /// Colors selected by rotation in color mode
    pub palette: Palette,
}

impl PanelConfig {
    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set interaction configuration
    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    /// Set encoder configuration
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set tone configuration
    pub fn with_tones(mut self, tones: ToneConfig) -> Self {
        self.tones = tones;
        self
    }

    /// Set button configuration
    pub fn with_button(mut self, button: ButtonConfig) -> Self {
        self.button = button;
        self
    }

    /// Set PWM configuration
    pub fn with_pwm(mut self, pwm: PwmConfig) -> Self {
        self.pwm = pwm;
        self
    }

    /// Set the color palette
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Reject values the panel cannot run with.
    pub fn validate(&self) -> Result<(), PanelError> {
        let t = &self.timing;
        if t.encoder_period_ms == 0 || t.encoder_period_ms > 2 {
            return Err(PanelError::Configuration(
                "encoder period must be 1 or 2 ms",
            ));
        }
        if t.button_period_ms == 0 {
            return Err(PanelError::Configuration("button period must be non-zero"));
        }
        if t.long_press_ms <= t.debounce_ms {
            return Err(PanelError::Configuration(
                "long press threshold must exceed the debounce window",
            ));
        }
        if self.interaction.steps_per_color == 0 {
            return Err(PanelError::Configuration("steps per color must be non-zero"));
        }
        if self.interaction.steps_per_dim == 0 {
            return Err(PanelError::Configuration("steps per dim must be non-zero"));
        }
        if self.pwm.led_hz == 0 || self.pwm.servo_hz == 0 {
            return Err(PanelError::Configuration("PWM frequency must be non-zero"));
        }
        if self.palette.is_empty() {
            return Err(PanelError::Configuration("palette is empty"));
        }
        self.tones.validate()
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Sampling cadences and gesture thresholds, all in milliseconds
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Encoder sampling period (must be ≤ 2 ms)
    pub encoder_period_ms: u32,
    /// Button sampling period
    pub button_period_ms: u32,
    /// Minimum time between accepted button level changes
    pub debounce_ms: u32,
    /// Hold time at or above which a release is a long press
    pub long_press_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            encoder_period_ms: 1,
            button_period_ms: 10,
            debounce_ms: 50,
            long_press_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Set the encoder sampling period
    pub fn with_encoder_period_ms(mut self, ms: u32) -> Self {
        self.encoder_period_ms = ms;
        self
    }

    /// Set the button sampling period
    pub fn with_button_period_ms(mut self, ms: u32) -> Self {
        self.button_period_ms = ms;
        self
    }

    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the long-press threshold
    pub fn with_long_press_ms(mut self, ms: u32) -> Self {
        self.long_press_ms = ms;
        self
    }
}

// ============================================================================
// Interaction Config
// ============================================================================

/// Rotation granularity and fade behavior
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionConfig {
    /// Detents needed to move one full palette entry
    pub steps_per_color: u8,
    /// Detents needed to sweep intensity from 0 to 255
    pub steps_per_dim: u8,
    /// Length of the fade to black on power off
    pub power_off_fade_ms: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            steps_per_color: 4,
            steps_per_dim: 20,
            power_off_fade_ms: 300,
        }
    }
}

impl InteractionConfig {
    /// Set steps per color change
    pub fn with_steps_per_color(mut self, steps: u8) -> Self {
        self.steps_per_color = steps;
        self
    }

    /// Set steps per full dim sweep
    pub fn with_steps_per_dim(mut self, steps: u8) -> Self {
        self.steps_per_dim = steps;
        self
    }

    /// Set the power-off fade length
    pub fn with_power_off_fade_ms(mut self, ms: u32) -> Self {
        self.power_off_fade_ms = ms;
        self
    }

    /// Intensity change per dim-mode detent.
    pub fn dim_step(&self) -> u8 {
        255 / self.steps_per_dim.max(1)
    }
}

// ============================================================================
// Encoder Config
// ============================================================================

/// Quadrature decoding calibration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Which DT/CLK relation means clockwise on this encoder
    pub convention: DirectionConvention,
    /// Which CLK edges produce events
    pub edges: EdgeFilter,
}

impl EncoderConfig {
    /// Set the direction convention
    pub fn with_convention(mut self, convention: DirectionConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the edge filter
    pub fn with_edges(mut self, edges: EdgeFilter) -> Self {
        self.edges = edges;
        self
    }
}

// ============================================================================
// Button Config
// ============================================================================

/// Push-button wiring
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonConfig {
    /// Pressed reads low (pull-up wiring)
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { active_low: true }
    }
}

impl ButtonConfig {
    /// Set the active level
    pub fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }
}

// ============================================================================
// Tone Config
// ============================================================================

/// Shortest silence between melody notes.
pub const MIN_GAP_MS: u32 = 20;
/// Longest silence between melody notes.
pub const MAX_GAP_MS: u32 = 50;

/// Buzzer feedback settings
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneConfig {
    /// Length of each note in the power melodies
    pub note_ms: u32,
    /// Silence between melody notes (20-50 ms)
    pub gap_ms: u32,
    /// Length of the mode-switch confirmation tone
    pub mode_switch_ms: u32,
    /// Beep on each detent while powered
    pub rotation_feedback: bool,
    /// Rotation beep for clockwise detents
    pub clockwise_hz: u32,
    /// Rotation beep for counter-clockwise detents
    pub counter_clockwise_hz: u32,
    /// Tone played when the button goes down
    pub press_hz: u32,
    /// Tone confirming a switch into dim mode
    pub dim_mode_hz: u32,
    /// Tone confirming a switch into color mode
    pub color_mode_hz: u32,
    /// Buzzer duty while sounding (0.0-1.0)
    pub duty: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            note_ms: 50,
            gap_ms: 20,
            mode_switch_ms: 100,
            rotation_feedback: true,
            clockwise_hz: 440,
            counter_clockwise_hz: 392,
            press_hz: NOTE_C5,
            dim_mode_hz: NOTE_E5,
            color_mode_hz: NOTE_G5,
            duty: 0.5,
        }
    }
}

impl ToneConfig {
    /// Set the melody note length
    pub fn with_note_ms(mut self, ms: u32) -> Self {
        self.note_ms = ms;
        self
    }

    /// Set the inter-note gap, clamped to 20-50 ms
    pub fn with_gap_ms(mut self, ms: u32) -> Self {
        self.gap_ms = ms.clamp(MIN_GAP_MS, MAX_GAP_MS);
        self
    }

    /// Enable or disable rotation beeps
    pub fn with_rotation_feedback(mut self, enabled: bool) -> Self {
        self.rotation_feedback = enabled;
        self
    }

    /// Set the buzzer duty, clamped to 0.0-1.0
    pub fn with_duty(mut self, duty: f32) -> Self {
        self.duty = duty.clamp(0.0, 1.0);
        self
    }

    /// Set the mode-switch confirmation tones
    pub fn with_mode_tones(mut self, dim_mode_hz: u32, color_mode_hz: u32) -> Self {
        self.dim_mode_hz = dim_mode_hz;
        self.color_mode_hz = color_mode_hz;
        self
    }

    /// Reject tone settings the buzzer cannot play.
    ///
    /// The builders clamp, but a config built field by field or loaded from
    /// a file is checked here.
    pub fn validate(&self) -> Result<(), PanelError> {
        if self.note_ms == 0 || self.mode_switch_ms == 0 {
            return Err(PanelError::Configuration("tone length must be non-zero"));
        }
        if !(MIN_GAP_MS..=MAX_GAP_MS).contains(&self.gap_ms) {
            return Err(PanelError::Configuration(
                "note gap must be between 20 and 50 ms",
            ));
        }
        if !(0.0..=1.0).contains(&self.duty) {
            return Err(PanelError::Configuration(
                "buzzer duty must be between 0.0 and 1.0",
            ));
        }
        let freqs = [
            self.clockwise_hz,
            self.counter_clockwise_hz,
            self.press_hz,
            self.dim_mode_hz,
            self.color_mode_hz,
        ];
        if freqs.contains(&0) {
            return Err(PanelError::Configuration("tone frequency must be non-zero"));
        }
        Ok(())
    }
}

// ============================================================================
// PWM Config
// ============================================================================

/// PWM carrier frequencies
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PwmConfig {
    /// LED channel frequency
    pub led_hz: u32,
    /// Servo frame frequency
    pub servo_hz: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            led_hz: 1000,
            servo_hz: 50,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.timing.encoder_period_ms, 1);
        assert_eq!(config.timing.button_period_ms, 10);
        assert_eq!(config.timing.debounce_ms, 50);
        assert_eq!(config.timing.long_press_ms, 1000);
        assert_eq!(config.tones.gap_ms, 20);
        assert_eq!(config.interaction.steps_per_color, 4);
        assert_eq!(config.interaction.steps_per_dim, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dim_step_matches_integer_division() {
        assert_eq!(InteractionConfig::default().dim_step(), 12);
        assert_eq!(InteractionConfig::default().with_steps_per_dim(255).dim_step(), 1);
    }

    #[test]
    fn rejects_slow_encoder_period() {
        let config =
            PanelConfig::default().with_timing(TimingConfig::default().with_encoder_period_ms(5));
        assert!(matches!(
            config.validate(),
            Err(PanelError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_zero_steps() {
        let config = PanelConfig::default()
            .with_interaction(InteractionConfig::default().with_steps_per_color(0));
        assert!(config.validate().is_err());

        let config = PanelConfig::default()
            .with_interaction(InteractionConfig::default().with_steps_per_dim(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_long_press_inside_debounce() {
        let config = PanelConfig::default().with_timing(
            TimingConfig::default()
                .with_debounce_ms(100)
                .with_long_press_ms(80),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn gap_is_clamped() {
        assert_eq!(ToneConfig::default().with_gap_ms(5).gap_ms, 20);
        assert_eq!(ToneConfig::default().with_gap_ms(35).gap_ms, 35);
        assert_eq!(ToneConfig::default().with_gap_ms(200).gap_ms, 50);
    }

    #[test]
    fn mode_tones_are_configurable() {
        let tones = ToneConfig::default();
        assert_eq!((tones.dim_mode_hz, tones.color_mode_hz), (NOTE_E5, NOTE_G5));

        let tones = tones.with_mode_tones(1000, 2000);
        assert_eq!((tones.dim_mode_hz, tones.color_mode_hz), (1000, 2000));
        assert!(tones.validate().is_ok());
        assert!(ToneConfig::default().with_mode_tones(0, 2000).validate().is_err());
    }

    #[test]
    fn builder_pattern() {
        let config = PanelConfig::default()
            .with_timing(
                TimingConfig::default()
                    .with_button_period_ms(5)
                    .with_debounce_ms(30),
            )
            .with_button(ButtonConfig::default().with_active_low(false))
            .with_tones(ToneConfig::default().with_rotation_feedback(false));

        assert_eq!(config.timing.button_period_ms, 5);
        assert_eq!(config.timing.debounce_ms, 30);
        assert!(!config.button.active_low);
        assert!(!config.tones.rotation_feedback);
    }
}
