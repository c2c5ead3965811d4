//! The encoder-driven interaction state machine.
//!
//! The machine owns all user-visible state (power, mode, selected color,
//! progress toward the next color, intensity) and is its only writer. It
//! knows nothing about hardware or time: each [`PanelEvent`] yields a
//! [`Reaction`], a short list of [`Effect`]s for the panel to carry out.
//!
//! # States
//!
//! | Current | Event | Next | Effects |
//! |---------|-------|------|---------|
//! | On/Color | Rotate | On/Color | color between palette neighbors |
//! | On/Dim | Rotate | On/Dim | color at new intensity |
//! | On/* | ShortPress | On/other mode | mode tone, persist |
//! | On/* | LongPress | Off | fade to black, power-off tune, persist |
//! | Off | ShortPress or LongPress | On/Color | color, power-on tune, persist |
//! | Off | Rotate | Off | none |
//! | any | Pressed | unchanged | tick tone |
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::color::Rgb;
//! use rs_rgbknob::config::PanelConfig;
//! use rs_rgbknob::encoder::Direction;
//! use rs_rgbknob::interaction::{InteractionStateMachine, PanelEvent};
//!
//! let mut machine = InteractionStateMachine::new(&PanelConfig::default()).unwrap();
//! assert_eq!(machine.output_color(), Rgb::RED);
//!
//! for _ in 0..4 {
//!     machine.handle(PanelEvent::Rotate(Direction::Clockwise));
//! }
//! assert_eq!(machine.state().color_index, 1);
//! assert_eq!(machine.output_color(), Rgb::GREEN);
//! ```

use crate::button::ButtonEvent;
use crate::color::{Palette, Rgb};
use crate::config::{InteractionConfig, PanelConfig, ToneConfig};
use crate::encoder::{Direction, RotationEvent};
use crate::error::{report_defect, PanelError};
use crate::store::PersistedSnapshot;
use crate::tone::Melody;

/// What rotating the knob adjusts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Rotation walks the palette.
    #[default]
    Color,
    /// Rotation changes intensity.
    Dim,
}

impl Mode {
    /// The other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Mode::Color => Mode::Dim,
            Mode::Dim => Mode::Color,
        }
    }
}

/// Whether the LED is lit. Serializes as a boolean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "bool", into = "bool"))]
pub enum PowerState {
    /// Dark; rotation is ignored.
    Off,
    /// Lit.
    #[default]
    On,
}

impl PowerState {
    /// `true` when on.
    pub const fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl From<PowerState> for bool {
    fn from(power: PowerState) -> Self {
        power.is_on()
    }
}

/// Input to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelEvent {
    /// One encoder detent.
    Rotate(Direction),
    /// Button went down (feedback only).
    Pressed,
    /// Button released before the long-press threshold.
    ShortPress,
    /// Button released after the long-press threshold.
    LongPress,
}

impl From<RotationEvent> for PanelEvent {
    fn from(event: RotationEvent) -> Self {
        PanelEvent::Rotate(event.direction)
    }
}

impl From<ButtonEvent> for PanelEvent {
    fn from(event: ButtonEvent) -> Self {
        match event {
            ButtonEvent::Pressed => PanelEvent::Pressed,
            ButtonEvent::ShortPress => PanelEvent::ShortPress,
            ButtonEvent::LongPress => PanelEvent::LongPress,
        }
    }
}

/// User-visible state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionState {
    /// Active rotation mode.
    pub mode: Mode,
    /// Selected palette entry.
    pub color_index: usize,
    /// Detents taken toward a neighbor color; the sign is the direction.
    /// Always strictly inside `(-steps_per_color, steps_per_color)`.
    pub progress_steps: i32,
    /// Brightness, 0-255.
    pub intensity: u8,
    /// Power state.
    pub power: PowerState,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::from(PersistedSnapshot::default())
    }
}

impl From<PersistedSnapshot> for InteractionState {
    fn from(snapshot: PersistedSnapshot) -> Self {
        Self {
            mode: snapshot.mode,
            color_index: snapshot.color_index,
            progress_steps: 0,
            intensity: snapshot.intensity,
            power: snapshot.power,
        }
    }
}

/// Maximum effects produced by one event.
pub const MAX_EFFECTS: usize = 4;

/// Output work requested by the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Show a color now, cancelling any fade.
    ShowColor(Rgb),
    /// Fade from the current color.
    FadeTo {
        /// Final color.
        color: Rgb,
        /// Fade length.
        duration_ms: u32,
    },
    /// Play a melody, replacing any in progress.
    Play(Melody),
    /// Write the snapshot to the settings store.
    Persist(PersistedSnapshot),
}

/// Effects produced by one event, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    effects: heapless::Vec<Effect, MAX_EFFECTS>,
}

impl Reaction {
    fn push(&mut self, effect: Effect) {
        if self.effects.push(effect).is_err() {
            report_defect(PanelError::Configuration("reaction holds too many effects"));
        }
    }

    /// The effects.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Whether the event had no effect.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// The snapshot to persist, if this reaction persists.
    pub fn persisted(&self) -> Option<&PersistedSnapshot> {
        self.effects.iter().find_map(|e| match e {
            Effect::Persist(snapshot) => Some(snapshot),
            _ => None,
        })
    }
}

impl IntoIterator for Reaction {
    type Item = Effect;
    type IntoIter = <heapless::Vec<Effect, MAX_EFFECTS> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}

/// Maps panel events to state changes and effects.
#[derive(Clone, Debug)]
pub struct InteractionStateMachine {
    state: InteractionState,
    palette: Palette,
    interaction: InteractionConfig,
    tones: ToneConfig,
}

impl InteractionStateMachine {
    /// Machine in the default state (Color, first color, full intensity, on).
    pub fn new(config: &PanelConfig) -> Result<Self, PanelError> {
        Self::from_snapshot(config, None)
    }

    /// Machine seeded from a stored snapshot, or defaults when there is none.
    ///
    /// An out-of-range color index (palette shrank since it was saved)
    /// falls back to the first color.
    pub fn from_snapshot(
        config: &PanelConfig,
        snapshot: Option<PersistedSnapshot>,
    ) -> Result<Self, PanelError> {
        config.validate()?;

        let mut state = InteractionState::from(snapshot.unwrap_or_default());
        if !config.palette.contains_index(state.color_index) {
            log::warn!(
                "stored color index {} out of range for {} colors, using 0",
                state.color_index,
                config.palette.len()
            );
            state.color_index = 0;
        }

        Ok(Self {
            state,
            palette: config.palette.clone(),
            interaction: config.interaction.clone(),
            tones: config.tones.clone(),
        })
    }

    /// Apply one event.
    pub fn handle(&mut self, event: PanelEvent) -> Reaction {
        let mut reaction = Reaction::default();

        if !self.palette.contains_index(self.state.color_index) {
            report_defect(PanelError::InvalidTransition {
                power: self.state.power,
                event,
            });
            self.state.color_index = 0;
            self.state.progress_steps = 0;
        }

        match (self.state.power, event) {
            (_, PanelEvent::Pressed) => {
                reaction.push(Effect::Play(Melody::single(
                    self.tones.press_hz,
                    self.tones.note_ms,
                )));
            }
            (PowerState::Off, PanelEvent::Rotate(_)) => {
                log::trace!("rotation ignored while off");
            }
            (PowerState::Off, PanelEvent::ShortPress | PanelEvent::LongPress) => {
                self.state.power = PowerState::On;
                self.state.mode = Mode::Color;
                self.state.progress_steps = 0;
                log::info!("power on, color {}", self.state.color_index);

                reaction.push(Effect::ShowColor(self.output_color()));
                reaction.push(Effect::Play(Melody::power_on(&self.tones)));
                reaction.push(Effect::Persist(self.snapshot()));
            }
            (PowerState::On, PanelEvent::Rotate(direction)) => {
                match self.state.mode {
                    Mode::Color => self.rotate_color(direction),
                    Mode::Dim => self.rotate_dim(direction),
                }
                reaction.push(Effect::ShowColor(self.output_color()));
                if self.tones.rotation_feedback {
                    let hz = match direction {
                        Direction::Clockwise => self.tones.clockwise_hz,
                        Direction::CounterClockwise => self.tones.counter_clockwise_hz,
                    };
                    reaction.push(Effect::Play(Melody::single(hz, self.tones.note_ms)));
                }
            }
            (PowerState::On, PanelEvent::ShortPress) => {
                self.state.mode = self.state.mode.toggled();
                self.state.progress_steps = 0;
                log::info!("mode {:?}", self.state.mode);

                let hz = match self.state.mode {
                    Mode::Dim => self.tones.dim_mode_hz,
                    Mode::Color => self.tones.color_mode_hz,
                };
                reaction.push(Effect::ShowColor(self.output_color()));
                reaction.push(Effect::Play(Melody::single(hz, self.tones.mode_switch_ms)));
                reaction.push(Effect::Persist(self.snapshot()));
            }
            (PowerState::On, PanelEvent::LongPress) => {
                self.state.power = PowerState::Off;
                self.state.progress_steps = 0;
                log::info!("power off");

                reaction.push(Effect::FadeTo {
                    color: Rgb::BLACK,
                    duration_ms: self.interaction.power_off_fade_ms,
                });
                reaction.push(Effect::Play(Melody::power_off(&self.tones)));
                reaction.push(Effect::Persist(self.snapshot()));
            }
        }

        reaction
    }

    fn rotate_color(&mut self, direction: Direction) {
        let steps = self.interaction.steps_per_color as i32;
        self.state.progress_steps += direction.sign();

        if self.state.progress_steps.abs() >= steps {
            let offset = self.state.progress_steps.signum();
            self.state.color_index = self.palette.wrap(self.state.color_index, offset);
            self.state.progress_steps = 0;
            log::debug!("color index {}", self.state.color_index);
        }
    }

    fn rotate_dim(&mut self, direction: Direction) {
        let step = self.interaction.dim_step() as i32;
        let intensity = self.state.intensity as i32 + direction.sign() * step;
        self.state.intensity = intensity.clamp(0, 255) as u8;
        log::debug!("intensity {}", self.state.intensity);
    }

    /// Progress toward the neighbor color, -1.0 to 1.0.
    pub fn progress(&self) -> f32 {
        self.state.progress_steps as f32 / self.interaction.steps_per_color as f32
    }

    /// The color the LED should show for the current state.
    pub fn output_color(&self) -> Rgb {
        if !self.state.power.is_on() {
            return Rgb::BLACK;
        }

        let base = self.palette.get(self.state.color_index);
        let color = match self.state.progress_steps.signum() {
            0 => base,
            sign => {
                let neighbor = self.palette.get(self.palette.wrap(self.state.color_index, sign));
                let fraction = (self.state.progress_steps * sign) as f32
                    / self.interaction.steps_per_color as f32;
                base.lerp(neighbor, fraction)
            }
        };
        color.scaled(self.state.intensity)
    }

    /// Current state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The persisted subset of the current state.
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            mode: self.state.mode,
            color_index: self.state.color_index,
            intensity: self.state.intensity,
            power: self.state.power,
        }
    }

    /// The palette rotation walks.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
