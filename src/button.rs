//! Push-button debouncing and press gesture classification.
//!
//! The button is polled (10 ms by default). A level change is accepted only
//! when at least the debounce window has passed since the last accepted
//! change; anything faster is a bounce and is dropped, not queued. Accepted
//! presses emit [`ButtonEvent::Pressed`] for feedback; accepted releases are
//! classified by how long the button was held.

use crate::config::{ButtonConfig, TimingConfig};
use crate::traits::DigitalInput;

/// Logical button events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    /// Button went down. Feedback only; the gesture comes on release.
    Pressed,
    /// Released before the long-press threshold.
    ShortPress,
    /// Released at or after the long-press threshold.
    LongPress,
}

/// Debounce and gesture bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Logical (debounced) pressed state.
    pub is_down: bool,
    /// When the current press was accepted.
    pub press_started_ms: Option<u64>,
    /// Last accepted logical level (`true` = pressed).
    pub last_level: bool,
    /// When the last level change was accepted.
    pub last_change_ms: Option<u64>,
}

/// Turns raw pressed/released samples into [`ButtonEvent`]s.
///
/// ```rust
/// use rs_rgbknob::button::{ButtonEvent, GestureClassifier};
///
/// let mut gestures = GestureClassifier::new(50, 1000);
///
/// assert_eq!(gestures.feed(true, 0), Some(ButtonEvent::Pressed));
/// assert_eq!(gestures.feed(false, 20), None); // bounce
/// assert_eq!(gestures.feed(false, 1200), Some(ButtonEvent::LongPress));
/// ```
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    state: ButtonState,
    debounce_ms: u64,
    long_press_ms: u64,
}

impl GestureClassifier {
    /// Classifier with an explicit debounce window and long-press threshold.
    pub fn new(debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            state: ButtonState::default(),
            debounce_ms: debounce_ms as u64,
            long_press_ms: long_press_ms as u64,
        }
    }

    /// Classifier using the configured thresholds.
    pub fn from_timing(timing: &TimingConfig) -> Self {
        Self::new(timing.debounce_ms, timing.long_press_ms)
    }

    /// Seed the level seen at boot.
    ///
    /// A button already held at boot has no recorded press, so its release
    /// produces no gesture.
    pub fn with_initial_level(mut self, pressed: bool) -> Self {
        self.state.last_level = pressed;
        self.state.is_down = pressed;
        self
    }

    /// Process one sample.
    pub fn feed(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed == self.state.last_level {
            return None;
        }
        if let Some(last) = self.state.last_change_ms {
            if now_ms.saturating_sub(last) < self.debounce_ms {
                log::trace!("button bounce dropped at {}ms", now_ms);
                return None;
            }
        }

        self.state.last_level = pressed;
        self.state.last_change_ms = Some(now_ms);
        self.state.is_down = pressed;

        if pressed {
            self.state.press_started_ms = Some(now_ms);
            return Some(ButtonEvent::Pressed);
        }

        let started = self.state.press_started_ms.take()?;
        let held = now_ms.saturating_sub(started);
        log::debug!("button held {}ms", held);
        if held >= self.long_press_ms {
            Some(ButtonEvent::LongPress)
        } else {
            Some(ButtonEvent::ShortPress)
        }
    }

    /// Current bookkeeping.
    pub fn state(&self) -> ButtonState {
        self.state
    }
}

/// Polls a button line and classifies its gestures.
pub struct ButtonMonitor<I: DigitalInput> {
    input: I,
    active_low: bool,
    classifier: GestureClassifier,
}

impl<I: DigitalInput> ButtonMonitor<I> {
    /// Monitor on `input`. Reads the line once to seed the boot level.
    pub fn new(mut input: I, timing: &TimingConfig, button: &ButtonConfig) -> Self {
        let pressed = input.read() != button.active_low;
        Self {
            input,
            active_low: button.active_low,
            classifier: GestureClassifier::from_timing(timing).with_initial_level(pressed),
        }
    }

    /// Read the line once and classify.
    pub fn sample(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let pressed = self.input.read() != self.active_low;
        self.classifier.feed(pressed, now_ms)
    }

    /// Debounced pressed state.
    pub fn is_down(&self) -> bool {
        self.classifier.state().is_down
    }

    /// Current bookkeeping.
    pub fn state(&self) -> ButtonState {
        self.classifier.state()
    }

    /// Release the input line.
    pub fn release(self) -> I {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockInput;

    #[test]
    fn short_press() {
        let mut g = GestureClassifier::new(50, 1000);
        assert_eq!(g.feed(true, 100), Some(ButtonEvent::Pressed));
        assert!(g.state().is_down);
        assert_eq!(g.feed(false, 300), Some(ButtonEvent::ShortPress));
        assert!(!g.state().is_down);
    }

    #[test]
    fn long_press_at_threshold() {
        let mut g = GestureClassifier::new(50, 1000);
        g.feed(true, 0);
        assert_eq!(g.feed(false, 1000), Some(ButtonEvent::LongPress));
    }

    #[test]
    fn just_under_threshold_is_short() {
        let mut g = GestureClassifier::new(50, 1000);
        g.feed(true, 0);
        assert_eq!(g.feed(false, 999), Some(ButtonEvent::ShortPress));
    }

    #[test]
    fn bounce_within_window_dropped() {
        let mut g = GestureClassifier::new(50, 1000);
        assert_eq!(g.feed(true, 0), Some(ButtonEvent::Pressed));
        assert_eq!(g.feed(false, 10), None);
        assert_eq!(g.feed(true, 20), None);
        assert_eq!(g.feed(false, 49), None);
        // Still released once the window passes: accepted then
        assert_eq!(g.feed(false, 50), Some(ButtonEvent::ShortPress));
    }

    #[test]
    fn release_without_press_is_silent() {
        let mut g = GestureClassifier::new(50, 1000).with_initial_level(true);
        assert_eq!(g.feed(false, 5000), None);
        assert_eq!(g.feed(true, 6000), Some(ButtonEvent::Pressed));
    }

    #[test]
    fn first_change_accepted_immediately() {
        let mut g = GestureClassifier::new(50, 1000);
        assert_eq!(g.feed(true, 3), Some(ButtonEvent::Pressed));
        assert_eq!(g.state().last_change_ms, Some(3));
        assert_eq!(g.state().press_started_ms, Some(3));
    }

    #[test]
    fn monitor_is_active_low() {
        // idle high, pressed low
        let input = MockInput::from_levels(&[true, false, false, true]);
        let mut button =
            ButtonMonitor::new(input, &TimingConfig::default(), &ButtonConfig::default());

        assert_eq!(button.sample(10), Some(ButtonEvent::Pressed));
        assert!(button.is_down());
        assert_eq!(button.sample(20), None);
        assert_eq!(button.sample(200), Some(ButtonEvent::ShortPress));
        assert!(!button.is_down());
    }

    #[test]
    fn monitor_held_at_boot() {
        let input = MockInput::from_levels(&[false, true]);
        let mut button =
            ButtonMonitor::new(input, &TimingConfig::default(), &ButtonConfig::default());

        assert!(button.is_down());
        assert_eq!(button.sample(100), None);
        assert_eq!(button.state().press_started_ms, None);
    }

    #[test]
    fn monitor_active_high() {
        let input = MockInput::from_levels(&[false, true]);
        let config = ButtonConfig::default().with_active_low(false);
        let mut button = ButtonMonitor::new(input, &TimingConfig::default(), &config);

        assert_eq!(button.sample(10), Some(ButtonEvent::Pressed));
    }
}
