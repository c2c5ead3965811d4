//! Hardware abstraction traits for PWM outputs, digital inputs and timing.
//!
//! This module defines the core hardware interfaces that allow rs-rgbknob to
//! run on a microcontroller and on the desktop with mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`PwmChannel`] | One PWM output (LED color channel, buzzer, servo) |
//! | [`DigitalInput`] | One polled input line (encoder CLK/DT, push button) |
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`Delay`] | Async tick sleep for the cooperative loop |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::traits::PwmChannel;
//! use rs_rgbknob::hal::MockPwm;
//!
//! let mut pwm = MockPwm::new();
//! pwm.set_frequency(1000).unwrap();
//! pwm.set_duty_fraction(0.5).unwrap();
//!
//! assert_eq!(pwm.frequency_hz, 1000);
//! assert_eq!(pwm.duty, 0.5);
//! ```

/// A single PWM output channel.
///
/// Implement this for your PWM peripheral. Drivers such as
/// [`RgbLed`](crate::drivers::RgbLed) and [`Buzzer`](crate::drivers::Buzzer)
/// hold one or more channels and never contain decision logic of their own.
///
/// # Implementation Notes
///
/// - Duty fractions outside 0.0-1.0 should be clamped
/// - Writes are assumed synchronous and reliable; callers do not retry
/// - `disable()` should leave the pin at a safe (inactive) level
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_rgbknob::traits::PwmChannel;
///
/// struct MyPwm { /* hardware handles */ }
///
/// impl PwmChannel for MyPwm {
///     type Error = ();
///
///     fn set_frequency(&mut self, hz: u32) -> Result<(), ()> {
///         // Reprogram the timer...
///         Ok(())
///     }
///
///     fn set_duty_fraction(&mut self, duty: f32) -> Result<(), ()> {
///         let raw = (duty.clamp(0.0, 1.0) * 65535.0) as u16;
///         // Write compare register...
///         Ok(())
///     }
///
///     fn disable(&mut self) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait PwmChannel {
    /// Error type for PWM operations.
    type Error: core::fmt::Debug;

    /// Set the PWM carrier frequency in hertz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Set the active-high fraction of the period (0.0 to 1.0).
    ///
    /// Values outside this range should be clamped.
    fn set_duty_fraction(&mut self, duty: f32) -> Result<(), Self::Error>;

    /// Stop driving the output.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Convenience method to drive the output fully inactive.
    fn off(&mut self) -> Result<(), Self::Error> {
        self.set_duty_fraction(0.0)
    }
}

/// A polled digital input line.
///
/// Reads are assumed infallible at this layer. Pull-up wiring and active-low
/// buttons are handled by the consumer, not the implementation.
pub trait DigitalInput {
    /// Returns the current electrical level (`true` = high).
    fn read(&mut self) -> bool;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for debounce, long-press and
/// transition timing. On desktop this can wrap `std::time::Instant`. On
/// embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::traits::Clock;
/// use rs_rgbknob::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Async delay trait for the cooperative scheduler.
///
/// The end of each tick is the only suspension point of the control loop.
pub trait Delay {
    /// Delay for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) -> impl core::future::Future<Output = ()>;
}
