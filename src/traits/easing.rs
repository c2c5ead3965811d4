//! Easing curves that control how a fade progresses over time.
//!
//! This module defines the [`Easing`] trait and three built-in curves. The
//! transition engine stores a [`Curve`], a small enum over the built-ins, so
//! fades can be kept in a fixed slot without allocation.
//!
//! # Built-in Curves
//!
//! | Curve | Use Case |
//! |-------|----------|
//! | [`Immediate`] | Direct color writes (rotation, power on) |
//! | [`Linear`] | Power-off fade, generic fades |
//! | [`EaseInOut`] | Softer fades that start and end slowly |
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::traits::{Easing, Linear};
//!
//! let fade = Linear::new(300);
//! let (fraction, done) = fade.fraction(150);
//! assert!((fraction - 0.5).abs() < 0.01);
//! assert!(!done);
//! ```

/// Describes how a value change is spread over time.
///
/// # Required Methods
///
/// - [`interpolate`](Self::interpolate): Calculate current value given elapsed time
/// - [`duration_ms`](Self::duration_ms): Return the total duration
///
/// # Example Implementation
///
/// ```rust
/// use rs_rgbknob::traits::Easing;
///
/// #[derive(Clone)]
/// struct Quadratic {
///     duration_ms: u64,
/// }
///
/// impl Easing for Quadratic {
///     fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool) {
///         if elapsed_ms >= self.duration_ms {
///             return (to, true);
///         }
///         let t = elapsed_ms as f32 / self.duration_ms as f32;
///         (from + (to - from) * t * t, false)
///     }
///
///     fn duration_ms(&self) -> u64 {
///         self.duration_ms
///     }
/// }
/// ```
pub trait Easing: Clone {
    /// Interpolate a value during a transition.
    ///
    /// # Arguments
    /// * `from` - Starting value
    /// * `to` - Target value
    /// * `elapsed_ms` - Time since transition started
    ///
    /// # Returns
    /// Tuple of (current_value, is_complete). A complete transition always
    /// returns exactly `to`.
    fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool);

    /// Total duration in milliseconds.
    fn duration_ms(&self) -> u64;

    /// Fraction of the way from start to end (0.0 to 1.0).
    fn fraction(&self, elapsed_ms: u64) -> (f32, bool) {
        self.interpolate(0.0, 1.0, elapsed_ms)
    }
}

/// Instant change - no interpolation.
///
/// ```rust
/// use rs_rgbknob::traits::{Easing, Immediate};
///
/// let (value, complete) = Immediate.interpolate(0.0, 1.0, 0);
/// assert_eq!(value, 1.0);
/// assert!(complete);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Immediate;

impl Easing for Immediate {
    fn interpolate(&self, _from: f32, to: f32, _elapsed_ms: u64) -> (f32, bool) {
        (to, true)
    }

    fn duration_ms(&self) -> u64 {
        0
    }
}

/// Linear interpolation over a fixed duration.
///
/// ```rust
/// use rs_rgbknob::traits::{Easing, Linear};
///
/// let curve = Linear::new(1000);
///
/// let (value, complete) = curve.interpolate(0.0, 1.0, 500);
/// assert!((value - 0.5).abs() < 0.01);
/// assert!(!complete);
///
/// let (value, complete) = curve.interpolate(0.0, 1.0, 1000);
/// assert_eq!(value, 1.0);
/// assert!(complete);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Linear {
    /// Total duration of the transition in milliseconds.
    pub duration_ms: u64,
}

impl Linear {
    /// Creates a linear curve of the given length.
    pub const fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }
}

impl Easing for Linear {
    fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool) {
        if self.duration_ms == 0 || elapsed_ms >= self.duration_ms {
            return (to, true);
        }

        let t = elapsed_ms as f32 / self.duration_ms as f32;
        (from + (to - from) * t, false)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Smooth ease-in-out using the smoothstep function `t² × (3 - 2t)`.
///
/// ```rust
/// use rs_rgbknob::traits::{Easing, EaseInOut};
///
/// let curve = EaseInOut::new(1000);
///
/// let (value, _) = curve.interpolate(0.0, 1.0, 100);
/// assert!(value < 0.1);
///
/// let (value, _) = curve.interpolate(0.0, 1.0, 500);
/// assert!((value - 0.5).abs() < 0.01);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EaseInOut {
    /// Total duration of the transition in milliseconds.
    pub duration_ms: u64,
}

impl EaseInOut {
    /// Creates an ease-in-out curve of the given length.
    pub const fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }
}

impl Easing for EaseInOut {
    fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool) {
        if self.duration_ms == 0 || elapsed_ms >= self.duration_ms {
            return (to, true);
        }

        let t = elapsed_ms as f32 / self.duration_ms as f32;
        (from + (to - from) * Self::smoothstep(t), false)
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Any of the built-in curves, stored by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Curve {
    /// See [`Immediate`].
    Immediate,
    /// See [`Linear`].
    Linear(u64),
    /// See [`EaseInOut`].
    EaseInOut(u64),
}

impl Easing for Curve {
    fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool) {
        match *self {
            Curve::Immediate => Immediate.interpolate(from, to, elapsed_ms),
            Curve::Linear(ms) => Linear::new(ms).interpolate(from, to, elapsed_ms),
            Curve::EaseInOut(ms) => EaseInOut::new(ms).interpolate(from, to, elapsed_ms),
        }
    }

    fn duration_ms(&self) -> u64 {
        match *self {
            Curve::Immediate => 0,
            Curve::Linear(ms) | Curve::EaseInOut(ms) => ms,
        }
    }
}

impl From<Immediate> for Curve {
    fn from(_: Immediate) -> Self {
        Curve::Immediate
    }
}

impl From<Linear> for Curve {
    fn from(curve: Linear) -> Self {
        Curve::Linear(curve.duration_ms)
    }
}

impl From<EaseInOut> for Curve {
    fn from(curve: EaseInOut) -> Self {
        Curve::EaseInOut(curve.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_zero_duration_completes() {
        let (value, complete) = Linear::new(0).interpolate(0.2, 0.8, 0);
        assert_eq!(value, 0.8);
        assert!(complete);
    }

    #[test]
    fn linear_descending() {
        let (value, complete) = Linear::new(100).interpolate(1.0, 0.0, 25);
        assert!((value - 0.75).abs() < 0.001);
        assert!(!complete);
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let curve = EaseInOut::new(1000);
        let (early, _) = curve.fraction(200);
        let (late, _) = curve.fraction(800);
        assert!((early + late - 1.0).abs() < 0.001);
    }

    #[test]
    fn ease_in_out_ends_exactly() {
        let (value, complete) = EaseInOut::new(300).interpolate(0.0, 1.0, 301);
        assert_eq!(value, 1.0);
        assert!(complete);
    }

    #[test]
    fn curve_dispatches_to_builtins() {
        assert_eq!(Curve::from(Linear::new(200)).fraction(100), Linear::new(200).fraction(100));
        assert_eq!(
            Curve::from(EaseInOut::new(200)).fraction(50),
            EaseInOut::new(200).fraction(50)
        );
        assert_eq!(Curve::from(Immediate).fraction(0), (1.0, true));
    }

    #[test]
    fn curve_duration() {
        assert_eq!(Curve::Immediate.duration_ms(), 0);
        assert_eq!(Curve::Linear(250).duration_ms(), 250);
        assert_eq!(Curve::EaseInOut(400).duration_ms(), 400);
    }
}
