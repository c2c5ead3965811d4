//! The panel coordinator: state machine, transitions, drivers and store.
//!
//! [`Panel`] feeds each [`PanelEvent`] to the interaction state machine,
//! carries out the resulting effects, and steps the transition engine so
//! that every output write for a tick happens inside that tick.
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::{Panel, PanelEvent};
//! use rs_rgbknob::color::Rgb;
//! use rs_rgbknob::config::PanelConfig;
//! use rs_rgbknob::drivers::{Buzzer, RgbLed};
//! use rs_rgbknob::hal::{MemoryStore, MockPwm};
//!
//! let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
//! let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
//! let mut panel = Panel::new(led, buzzer, MemoryStore::new(), PanelConfig::default()).unwrap();
//!
//! // First update shows the restored color
//! panel.update(0).unwrap();
//! assert_eq!(panel.led().color(), Rgb::RED);
//!
//! // Long press: fade out over 300 ms
//! panel.handle(PanelEvent::LongPress, 10).unwrap();
//! panel.update(310).unwrap();
//! assert_eq!(panel.led().color(), Rgb::BLACK);
//! ```

use crate::color::Rgb;
use crate::config::PanelConfig;
use crate::drivers::{Buzzer, RgbLed};
use crate::error::PanelError;
use crate::interaction::{Effect, InteractionState, InteractionStateMachine, PanelEvent};
use crate::store::PersistedSnapshot;
use crate::traits::{PwmChannel, SettingsStore};
use crate::transition::{Frame, TransitionEngine};

/// Point-in-time view of the panel, for logging and UIs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelStatus {
    /// Interaction state.
    pub state: InteractionState,
    /// Color-mode progress, -1.0 to 1.0.
    pub progress: f32,
    /// Color on the LED right now.
    pub color: Rgb,
    /// Buzzer frequency, if sounding.
    pub tone_hz: Option<u32>,
    /// Whether a fade is running.
    pub is_fading: bool,
    /// Whether a melody is running.
    pub is_playing: bool,
}

/// Drives the LED and buzzer from panel events.
///
/// # Type Parameters
///
/// - `P`: PWM channel type shared by the LED and buzzer
/// - `S`: settings store
pub struct Panel<P: PwmChannel, S: SettingsStore> {
    machine: InteractionStateMachine,
    engine: TransitionEngine,
    led: RgbLed<P>,
    buzzer: Buzzer<P>,
    store: S,
    config: PanelConfig,
}

impl<P: PwmChannel, S: SettingsStore> Panel<P, S> {
    /// Build the panel and restore state from `store`.
    ///
    /// A failed or empty load falls back to defaults. The restored color is
    /// written on the first [`update`](Self::update).
    pub fn new(
        led: RgbLed<P>,
        buzzer: Buzzer<P>,
        mut store: S,
        config: PanelConfig,
    ) -> Result<Self, PanelError> {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("could not load settings, using defaults: {:?}", e);
                None
            }
        };
        if snapshot.is_none() {
            log::info!("no saved settings, starting with defaults");
        }

        let machine = InteractionStateMachine::from_snapshot(&config, snapshot)?;
        log::info!("restored state: {:?}", machine.state());

        let mut engine = TransitionEngine::new(led.color());
        engine.set_color(machine.output_color());

        Ok(Self {
            machine,
            engine,
            led,
            buzzer,
            store,
            config,
        })
    }

    /// Handle one event and write the outputs for `now_ms`.
    ///
    /// Shorthand for [`apply`](Self::apply) followed by
    /// [`update`](Self::update). A tick that may see several events should
    /// apply them all and update once.
    pub fn handle(&mut self, event: PanelEvent, now_ms: u64) -> Result<(), P::Error> {
        self.apply(event, now_ms);
        self.update(now_ms).map(|_| ())
    }

    /// Feed one event to the state machine and queue its effects.
    ///
    /// Nothing is written to the LED or buzzer until the next
    /// [`update`](Self::update); a later event in the same tick replaces
    /// what an earlier one queued.
    pub fn apply(&mut self, event: PanelEvent, now_ms: u64) {
        log::debug!("event {:?}", event);
        for effect in self.machine.handle(event) {
            match effect {
                Effect::ShowColor(color) => self.engine.set_color(color),
                Effect::FadeTo { color, duration_ms } => {
                    self.engine.fade_to(color, duration_ms, now_ms)
                }
                Effect::Play(melody) => self.engine.play(melody, now_ms),
                Effect::Persist(snapshot) => self.persist(&snapshot),
            }
        }
    }

    /// Step fades and melodies and write any changed outputs.
    ///
    /// All three LED channels are written together. A color whose write
    /// fails is written again on the next update.
    pub fn update(&mut self, now_ms: u64) -> Result<Frame, P::Error> {
        let frame = self.engine.update(now_ms);
        let led = match frame.color {
            Some(color) => self.led.set_color(color).map(|()| self.engine.confirm(color)),
            None => Ok(()),
        };
        let buzzer = match frame.tone {
            Some(tone) => self.buzzer.apply(tone),
            None => Ok(()),
        };
        led?;
        buzzer?;
        Ok(frame)
    }

    fn persist(&mut self, snapshot: &PersistedSnapshot) {
        if let Err(e) = self.store.save(snapshot) {
            log::warn!("could not save settings: {:?}", e);
        }
    }

    /// Turn the LED off, silence the buzzer and release the channels.
    pub fn shutdown(&mut self) -> Result<(), P::Error> {
        log::info!("shutting down");
        self.engine.set_color(Rgb::BLACK);
        self.engine.stop_tone();
        self.led.off()?;
        self.engine.confirm(Rgb::BLACK);
        self.buzzer.silence()?;
        self.led.disable()?;
        self.buzzer.disable()
    }

    /// Snapshot of the panel.
    pub fn status(&self) -> PanelStatus {
        PanelStatus {
            state: *self.machine.state(),
            progress: self.machine.progress(),
            color: self.led.color(),
            tone_hz: self.buzzer.frequency(),
            is_fading: self.engine.is_fading(),
            is_playing: self.engine.is_playing(),
        }
    }

    /// Interaction state.
    pub fn state(&self) -> &InteractionState {
        self.machine.state()
    }

    /// The state machine.
    pub fn machine(&self) -> &InteractionStateMachine {
        &self.machine
    }

    /// The LED driver.
    pub fn led(&self) -> &RgbLed<P> {
        &self.led
    }

    /// The buzzer driver.
    pub fn buzzer(&self) -> &Buzzer<P> {
        &self.buzzer
    }

    /// The settings store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Configuration in use.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }
}
