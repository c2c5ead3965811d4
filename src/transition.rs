//! Time-sliced color fades and tone playback.
//!
//! The [`TransitionEngine`] has one color slot and one tone slot. Starting a
//! new fade or melody replaces whatever occupied that slot; nothing is
//! queued. The owner calls [`update`](TransitionEngine::update) once per
//! tick and gets back a [`Frame`] describing the output writes for that
//! tick, then [`confirm`](TransitionEngine::confirm)s the color it managed
//! to write.
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::color::Rgb;
//! use rs_rgbknob::transition::TransitionEngine;
//!
//! let mut engine = TransitionEngine::new(Rgb::new(200, 100, 0));
//!
//! // 300 ms fade to black
//! engine.fade_to(Rgb::BLACK, 300, 0);
//!
//! let frame = engine.update(150);
//! assert_eq!(frame.color, Some(Rgb::new(100, 50, 0)));
//! engine.confirm(Rgb::new(100, 50, 0));
//!
//! let frame = engine.update(300);
//! assert_eq!(frame.color, Some(Rgb::BLACK));
//! engine.confirm(Rgb::BLACK);
//! assert!(!engine.is_fading());
//! assert!(engine.update(310).is_empty());
//! ```

use crate::color::Rgb;
use crate::tone::{Melody, ToneCommand, TonePlayer};
use crate::traits::{Curve, Easing};

/// An in-progress color change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorFade {
    /// Color when the fade started.
    pub start: Rgb,
    /// Color the fade ends on.
    pub end: Rgb,
    /// Shape of the fade.
    pub curve: Curve,
    /// Timestamp when the fade started.
    pub started_ms: u64,
}

impl ColorFade {
    /// Color at `now_ms` and whether the fade is complete.
    ///
    /// A complete fade always yields exactly `end`.
    pub fn sample(&self, now_ms: u64) -> (Rgb, bool) {
        let (fraction, complete) = self.curve.fraction(now_ms.saturating_sub(self.started_ms));
        if complete {
            (self.end, true)
        } else {
            (self.start.lerp(self.end, fraction), false)
        }
    }

    /// Total length of the fade.
    pub fn duration_ms(&self) -> u64 {
        self.curve.duration_ms()
    }
}

/// Output writes produced by one engine step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// New LED color, if it changed.
    pub color: Option<Rgb>,
    /// Buzzer change, if any.
    pub tone: Option<ToneCommand>,
}

impl Frame {
    /// Whether the frame writes nothing.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.tone.is_none()
    }
}

/// Per-tick driver for color fades and melodies.
#[derive(Clone, Debug)]
pub struct TransitionEngine {
    fade: Option<ColorFade>,
    pending: Option<Rgb>,
    current: Rgb,
    tones: TonePlayer,
}

impl TransitionEngine {
    /// Engine whose output is already showing `initial`.
    pub fn new(initial: Rgb) -> Self {
        Self {
            fade: None,
            pending: None,
            current: initial,
            tones: TonePlayer::new(),
        }
    }

    /// Show `color` on the next update, cancelling any fade.
    pub fn set_color(&mut self, color: Rgb) {
        self.fade = None;
        self.pending = Some(color);
    }

    /// Linear fade from the current color to `end` over `duration_ms`.
    pub fn fade_to(&mut self, end: Rgb, duration_ms: u32, now_ms: u64) {
        self.fade_with(end, Curve::Linear(duration_ms as u64), now_ms);
    }

    /// Fade from the current color to `end` along `curve`.
    pub fn fade_with(&mut self, end: Rgb, curve: impl Into<Curve>, now_ms: u64) {
        let start = self.current_color();
        self.pending = None;
        self.fade = Some(ColorFade {
            start,
            end,
            curve: curve.into(),
            started_ms: now_ms,
        });
    }

    /// Start `melody`, replacing any melody in progress.
    pub fn play(&mut self, melody: Melody, now_ms: u64) {
        self.tones.play(melody, now_ms);
    }

    /// Abandon the current melody.
    pub fn stop_tone(&mut self) -> Option<ToneCommand> {
        self.tones.stop()
    }

    /// Step both slots to `now_ms`.
    ///
    /// A color in the frame stays owed until [`confirm`](Self::confirm)
    /// reports it written; until then it is handed out again on every
    /// update.
    pub fn update(&mut self, now_ms: u64) -> Frame {
        let color = if let Some(color) = self.pending {
            Some(color)
        } else if let Some(fade) = self.fade {
            let (color, complete) = fade.sample(now_ms);
            if complete {
                self.fade = None;
                if color != self.current {
                    // the end color must not be lost if this write fails
                    self.pending = Some(color);
                }
            }
            (color != self.current).then_some(color)
        } else {
            None
        };

        Frame {
            color,
            tone: self.tones.update(now_ms),
        }
    }

    /// Record that `color` is now showing on the output.
    pub fn confirm(&mut self, color: Rgb) {
        self.current = color;
        if self.pending == Some(color) {
            self.pending = None;
        }
    }

    /// Whether a fade is in progress.
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Whether a melody is in progress.
    pub fn is_playing(&self) -> bool {
        self.tones.is_playing()
    }

    /// The color the output is showing, or is about to show.
    pub fn current_color(&self) -> Rgb {
        self.pending.unwrap_or(self.current)
    }

    /// The active fade, if any.
    pub fn fade(&self) -> Option<&ColorFade> {
        self.fade.as_ref()
    }
}
