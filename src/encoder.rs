//! Polled quadrature decoding for the rotary encoder.
//!
//! The monitor samples CLK and DT on a fixed cadence (1 ms by default, never
//! slower than 2 ms) and emits one [`RotationEvent`] per CLK change. The
//! direction comes from comparing the new DT level with the new CLK level;
//! which relation means clockwise depends on how the encoder is wired and is
//! set with [`DirectionConvention`].
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::encoder::{
//!     Direction, DirectionConvention, EdgeFilter, QuadratureDecoder, QuadraturePhase,
//! };
//!
//! let mut decoder = QuadratureDecoder::new(
//!     QuadraturePhase::new(true, true),
//!     DirectionConvention::DtDiffersIsClockwise,
//!     EdgeFilter::Both,
//! );
//!
//! // CLK falls while DT stays high: DT differs from CLK
//! assert_eq!(decoder.decode(QuadraturePhase::new(false, true)), Some(Direction::Clockwise));
//! // No CLK change: nothing
//! assert_eq!(decoder.decode(QuadraturePhase::new(false, false)), None);
//! ```

use crate::config::EncoderConfig;
use crate::traits::{Clock, DigitalInput};

/// Rotation sense of one detent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Clockwise (increasing position).
    Clockwise,
    /// Counter-clockwise (decreasing position).
    CounterClockwise,
}

impl Direction {
    /// `+1` for clockwise, `-1` for counter-clockwise.
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// The opposite direction.
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Which DT/CLK relation, read right after a CLK change, means clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DirectionConvention {
    /// DT differs from CLK on a clockwise detent.
    #[default]
    DtDiffersIsClockwise,
    /// DT equals CLK on a clockwise detent.
    DtMatchesIsClockwise,
}

/// Which CLK edges produce rotation events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeFilter {
    /// Every CLK change.
    #[default]
    Both,
    /// Only high-to-low CLK changes (one event per detent on most encoders).
    Falling,
}

/// The two-bit encoder phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadraturePhase {
    /// CLK (A) level.
    pub clk: bool,
    /// DT (B) level.
    pub dt: bool,
}

impl QuadraturePhase {
    /// Phase from the two line levels.
    pub const fn new(clk: bool, dt: bool) -> Self {
        Self { clk, dt }
    }
}

/// A detent detected by the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationEvent {
    /// Rotation sense.
    pub direction: Direction,
}

/// Pure phase-to-direction decoder.
///
/// Holds only the previous phase; knows nothing about pins or time.
#[derive(Clone, Debug)]
pub struct QuadratureDecoder {
    last: QuadraturePhase,
    convention: DirectionConvention,
    edges: EdgeFilter,
}

impl QuadratureDecoder {
    /// Decoder starting from `initial`.
    pub fn new(
        initial: QuadraturePhase,
        convention: DirectionConvention,
        edges: EdgeFilter,
    ) -> Self {
        Self {
            last: initial,
            convention,
            edges,
        }
    }

    /// Feed the next phase. Returns a direction iff CLK changed and the
    /// change passes the edge filter.
    pub fn decode(&mut self, phase: QuadraturePhase) -> Option<Direction> {
        let clk_changed = phase.clk != self.last.clk;
        self.last = phase;

        if !clk_changed {
            return None;
        }
        if self.edges == EdgeFilter::Falling && phase.clk {
            return None;
        }

        let differs = phase.dt != phase.clk;
        let clockwise = match self.convention {
            DirectionConvention::DtDiffersIsClockwise => differs,
            DirectionConvention::DtMatchesIsClockwise => !differs,
        };
        Some(if clockwise {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        })
    }

    /// The most recently fed phase.
    pub fn last_phase(&self) -> QuadraturePhase {
        self.last
    }
}

/// Encoder bookkeeping, exposed read-only through [`EncoderMonitor::state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderState {
    /// Net detents since start or the last reset.
    pub position: i32,
    /// Phase seen at the last sample.
    pub last_phase: QuadraturePhase,
    /// Time of the last sample.
    pub last_sample_ms: u64,
}

/// Samples two input lines and turns them into rotation events.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::config::EncoderConfig;
/// use rs_rgbknob::encoder::{Direction, EncoderMonitor};
/// use rs_rgbknob::hal::MockInput;
///
/// let clk = MockInput::from_levels(&[true, false, true]);
/// let dt = MockInput::from_levels(&[true, true, false]);
/// let mut encoder = EncoderMonitor::new(clk, dt, &EncoderConfig::default(), 0);
///
/// let event = encoder.sample(1).unwrap();
/// assert_eq!(event.direction, Direction::Clockwise);
/// assert_eq!(encoder.position(), 1);
/// ```
pub struct EncoderMonitor<I: DigitalInput> {
    clk: I,
    dt: I,
    decoder: QuadratureDecoder,
    state: EncoderState,
}

impl<I: DigitalInput> EncoderMonitor<I> {
    /// Monitor reading `clk` and `dt`. Takes the first sample immediately to
    /// seed the previous phase.
    pub fn new(mut clk: I, mut dt: I, config: &EncoderConfig, now_ms: u64) -> Self {
        let initial = QuadraturePhase::new(clk.read(), dt.read());
        Self {
            clk,
            dt,
            decoder: QuadratureDecoder::new(initial, config.convention, config.edges),
            state: EncoderState {
                position: 0,
                last_phase: initial,
                last_sample_ms: now_ms,
            },
        }
    }

    /// Read both lines once and decode.
    pub fn sample(&mut self, now_ms: u64) -> Option<RotationEvent> {
        let phase = QuadraturePhase::new(self.clk.read(), self.dt.read());
        self.state.last_phase = phase;
        self.state.last_sample_ms = now_ms;

        let direction = self.decoder.decode(phase)?;
        self.state.position = self.state.position.wrapping_add(direction.sign());
        log::trace!("encoder {:?}, position {}", direction, self.state.position);
        Some(RotationEvent { direction })
    }

    /// Net detents since start or the last reset.
    pub fn position(&self) -> i32 {
        self.state.position
    }

    /// Zero the position counter.
    pub fn reset_position(&mut self) {
        self.state.position = 0;
    }

    /// Current bookkeeping.
    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Endless per-sample sequence, timestamped by `clock`.
    ///
    /// Each `next()` takes one sample; the item is `None` when that sample
    /// held no rotation. The iterator never ends.
    pub fn ticks<'a, C: Clock>(&'a mut self, clock: &'a C) -> Ticks<'a, I, C> {
        Ticks {
            monitor: self,
            clock,
        }
    }

    /// Release the input lines.
    pub fn release(self) -> (I, I) {
        (self.clk, self.dt)
    }
}

/// Iterator returned by [`EncoderMonitor::ticks`].
pub struct Ticks<'a, I: DigitalInput, C: Clock> {
    monitor: &'a mut EncoderMonitor<I>,
    clock: &'a C,
}

impl<I: DigitalInput, C: Clock> Iterator for Ticks<'_, I, C> {
    type Item = Option<RotationEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.monitor.sample(self.clock.now_ms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockInput};

    fn decoder(convention: DirectionConvention, edges: EdgeFilter) -> QuadratureDecoder {
        QuadratureDecoder::new(QuadraturePhase::new(true, true), convention, edges)
    }

    #[test]
    fn dt_only_change_is_ignored() {
        let mut d = decoder(DirectionConvention::default(), EdgeFilter::Both);
        assert_eq!(d.decode(QuadraturePhase::new(true, false)), None);
        assert_eq!(d.decode(QuadraturePhase::new(true, true)), None);
    }

    #[test]
    fn clockwise_full_cycle() {
        // CW under the default convention: DT lags so it differs from CLK
        // right after each CLK change.
        let mut d = decoder(DirectionConvention::default(), EdgeFilter::Both);
        assert_eq!(d.decode(QuadraturePhase::new(false, true)), Some(Direction::Clockwise));
        assert_eq!(d.decode(QuadraturePhase::new(false, false)), None);
        assert_eq!(d.decode(QuadraturePhase::new(true, false)), Some(Direction::Clockwise));
        assert_eq!(d.decode(QuadraturePhase::new(true, true)), None);
    }

    #[test]
    fn counter_clockwise_full_cycle() {
        let mut d = decoder(DirectionConvention::default(), EdgeFilter::Both);
        assert_eq!(d.decode(QuadraturePhase::new(true, false)), None);
        assert_eq!(
            d.decode(QuadraturePhase::new(false, false)),
            Some(Direction::CounterClockwise)
        );
        assert_eq!(d.decode(QuadraturePhase::new(false, true)), None);
        assert_eq!(
            d.decode(QuadraturePhase::new(true, true)),
            Some(Direction::CounterClockwise)
        );
    }

    #[test]
    fn convention_flips_direction() {
        let mut d = decoder(DirectionConvention::DtMatchesIsClockwise, EdgeFilter::Both);
        assert_eq!(
            d.decode(QuadraturePhase::new(false, true)),
            Some(Direction::CounterClockwise)
        );
    }

    #[test]
    fn falling_filter_skips_rising_edges() {
        let mut d = decoder(DirectionConvention::default(), EdgeFilter::Falling);
        assert_eq!(d.decode(QuadraturePhase::new(false, true)), Some(Direction::Clockwise));
        assert_eq!(d.decode(QuadraturePhase::new(true, false)), None);
        assert_eq!(d.last_phase(), QuadraturePhase::new(true, false));
    }

    #[test]
    fn direction_helpers() {
        assert_eq!(Direction::Clockwise.sign(), 1);
        assert_eq!(Direction::CounterClockwise.sign(), -1);
        assert_eq!(Direction::Clockwise.reversed(), Direction::CounterClockwise);
    }

    #[test]
    fn monitor_tracks_position_and_time() {
        let clk = MockInput::from_levels(&[true, false, true, false, true]);
        let dt = MockInput::from_levels(&[true, true, false, false, true]);
        let mut encoder = EncoderMonitor::new(clk, dt, &EncoderConfig::default(), 0);

        assert!(encoder.sample(1).is_some());
        assert!(encoder.sample(2).is_some());
        // CLK falls with DT low: counter-clockwise
        let event = encoder.sample(3).unwrap();
        assert_eq!(event.direction, Direction::CounterClockwise);
        assert_eq!(encoder.position(), 1);
        assert_eq!(encoder.state().last_sample_ms, 3);

        encoder.reset_position();
        assert_eq!(encoder.position(), 0);
    }

    #[test]
    fn ticks_is_lazy_and_endless() {
        let clk = MockInput::from_levels(&[true, false, true]);
        let dt = MockInput::from_levels(&[true, true, false]);
        let mut encoder = EncoderMonitor::new(clk, dt, &EncoderConfig::default(), 0);
        let clock = MockClock::new();

        // Input script holds its last level once exhausted.
        let events: Vec<_> = encoder.ticks(&clock).take(5).collect();
        assert_eq!(events.len(), 5);
        assert_eq!(events.iter().flatten().count(), 2);
        assert_eq!(encoder.position(), 2);
    }
}
