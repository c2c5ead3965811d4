//! Hobby servo outputs driven by pulse width.
//!
//! A standard servo expects one pulse per 20 ms frame (50 Hz); the pulse
//! width, between 0.5 and 2.5 ms, sets the horn angle. The duty fraction is
//! therefore `pulse_ms / frame_ms`.
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::hal::MockPwm;
//! use rs_rgbknob::servo::ServoBank;
//!
//! let channels = [MockPwm::new(), MockPwm::new(), MockPwm::new(), MockPwm::new()];
//! let mut bank = ServoBank::new(channels, 50).unwrap();
//! bank.init().unwrap();
//!
//! bank.set_all(ServoBank::<MockPwm>::position_for_count(15)).unwrap();
//! assert!(bank.servos().iter().all(|s| s.pulse_ms() == Some(1.5)));
//! ```

use crate::error::PanelError;
use crate::traits::PwmChannel;

/// Shortest pulse a servo accepts.
pub const MIN_PULSE_MS: f32 = 0.5;
/// Longest pulse a servo accepts.
pub const MAX_PULSE_MS: f32 = 2.5;
/// Number of servos in a [`ServoBank`].
pub const SERVO_COUNT: usize = 4;
/// Time between steps of a [`ServoSweep`].
pub const SWEEP_INTERVAL_MS: u32 = 50;

/// One servo on one PWM channel.
pub struct Servo<P: PwmChannel> {
    pwm: P,
    frame_hz: u32,
    pulse_ms: Option<f32>,
}

impl<P: PwmChannel> Servo<P> {
    /// Servo on `pwm` refreshed at `frame_hz`. Nothing is written until
    /// [`init`](Self::init).
    pub fn new(pwm: P, frame_hz: u32) -> Self {
        Self {
            pwm,
            frame_hz: frame_hz.max(1),
            pulse_ms: None,
        }
    }

    /// Program the frame rate.
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.pwm.set_frequency(self.frame_hz)
    }

    fn frame_ms(&self) -> f32 {
        1000.0 / self.frame_hz as f32
    }

    /// Set the pulse width, clamped to 0.5-2.5 ms.
    pub fn set_pulse_ms(&mut self, pulse_ms: f32) -> Result<(), P::Error> {
        let pulse_ms = pulse_ms.clamp(MIN_PULSE_MS, MAX_PULSE_MS);
        self.pwm.set_duty_fraction(pulse_ms / self.frame_ms())?;
        self.pulse_ms = Some(pulse_ms);
        Ok(())
    }

    /// Last pulse width written.
    pub fn pulse_ms(&self) -> Option<f32> {
        self.pulse_ms
    }

    /// Stop driving the servo. It goes limp.
    pub fn disable(&mut self) -> Result<(), P::Error> {
        self.pulse_ms = None;
        self.pwm.disable()
    }

    /// The underlying channel.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

/// Exactly four servos moved together or individually.
pub struct ServoBank<P: PwmChannel> {
    servos: heapless::Vec<Servo<P>, SERVO_COUNT>,
}

impl<P: PwmChannel> ServoBank<P> {
    /// Bank over `channels`. Anything other than four channels is a
    /// configuration error.
    pub fn new(channels: impl IntoIterator<Item = P>, frame_hz: u32) -> Result<Self, PanelError> {
        let mut servos = heapless::Vec::new();
        let mut overflow = 0;
        for pwm in channels {
            if servos.push(Servo::new(pwm, frame_hz)).is_err() {
                overflow += 1;
            }
        }
        let actual = servos.len() + overflow;
        if actual != SERVO_COUNT {
            return Err(PanelError::ChannelCount {
                component: "ServoBank",
                expected: SERVO_COUNT,
                actual,
            });
        }
        Ok(Self { servos })
    }

    /// Program the frame rate on every channel.
    pub fn init(&mut self) -> Result<(), P::Error> {
        for servo in &mut self.servos {
            servo.init()?;
        }
        Ok(())
    }

    /// Move every servo to `pulse_ms`.
    pub fn set_all(&mut self, pulse_ms: f32) -> Result<(), P::Error> {
        for servo in &mut self.servos {
            servo.set_pulse_ms(pulse_ms)?;
        }
        Ok(())
    }

    /// Move each servo to its own position.
    pub fn set_each(&mut self, positions: &[f32; SERVO_COUNT]) -> Result<(), P::Error> {
        for (servo, pulse_ms) in self.servos.iter_mut().zip(positions) {
            servo.set_pulse_ms(*pulse_ms)?;
        }
        Ok(())
    }

    /// Pulse width for an encoder count: 1.0 ms plus a tenth of a
    /// millisecond per count, repeating every ten counts.
    pub fn position_for_count(count: i32) -> f32 {
        1.0 + count.rem_euclid(10) as f32 / 10.0
    }

    /// Stop every servo.
    pub fn disable(&mut self) -> Result<(), P::Error> {
        for servo in &mut self.servos {
            servo.disable()?;
        }
        Ok(())
    }

    /// The four servos.
    pub fn servos(&self) -> &[Servo<P>] {
        &self.servos
    }
}

/// Evenly spaced pulse widths from `start` up to `end` inclusive.
///
/// Step the bank through it every [`SWEEP_INTERVAL_MS`].
///
/// ```rust
/// use rs_rgbknob::servo::ServoSweep;
///
/// let steps: Vec<f32> = ServoSweep::new(1.0, 1.5, 0.25).collect();
/// assert_eq!(steps, [1.0, 1.25, 1.5]);
/// ```
#[derive(Clone, Debug)]
pub struct ServoSweep {
    start: f32,
    end: f32,
    step: f32,
    index: u32,
}

impl ServoSweep {
    /// Sweep from `start` to `end` in increments of `step`.
    ///
    /// A non-positive step yields only `start`.
    pub fn new(start: f32, end: f32, step: f32) -> Self {
        Self {
            start,
            end,
            step,
            index: 0,
        }
    }
}

impl Iterator for ServoSweep {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.step <= 0.0 && self.index > 0 {
            return None;
        }
        // computed from the index so rounding never accumulates
        let position = self.start + self.step * self.index as f32;
        if position > self.end + self.step * 1e-3 {
            return None;
        }
        self.index += 1;
        Some(position.min(self.end))
    }
}
