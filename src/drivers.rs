//! RGB LED and buzzer drivers.
//!
//! Thin wrappers over [`PwmChannel`]: they translate colors and tones into
//! duty/frequency writes and hold no decision logic.

use crate::color::Rgb;
use crate::tone::ToneCommand;
use crate::traits::PwmChannel;

/// Common-cathode RGB LED on three PWM channels.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::color::Rgb;
/// use rs_rgbknob::drivers::RgbLed;
/// use rs_rgbknob::hal::MockPwm;
///
/// let mut led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
/// led.set_color(Rgb::new(255, 0, 51)).unwrap();
///
/// let [r, g, b] = led.channels();
/// assert_eq!(r.duty, 1.0);
/// assert_eq!(g.duty, 0.0);
/// assert!((b.duty - 0.2).abs() < 0.001);
/// ```
pub struct RgbLed<P: PwmChannel> {
    channels: [P; 3],
    color: Rgb,
}

impl<P: PwmChannel> RgbLed<P> {
    /// LED on `red`, `green`, `blue`, all at `frequency_hz`, starting dark.
    pub fn new(red: P, green: P, blue: P, frequency_hz: u32) -> Result<Self, P::Error> {
        let mut led = Self {
            channels: [red, green, blue],
            color: Rgb::BLACK,
        };
        for channel in &mut led.channels {
            channel.set_frequency(frequency_hz)?;
            channel.off()?;
        }
        Ok(led)
    }

    /// Write all three channels.
    ///
    /// If any write fails the previous color is written back, so the LED
    /// never keeps a mix of old and new channels when the rollback works.
    /// [`color`](Self::color) only changes on success.
    pub fn set_color(&mut self, color: Rgb) -> Result<(), P::Error> {
        if let Err(e) = self.write(color) {
            if self.write(self.color).is_err() {
                log::warn!("LED left partly updated; could not restore {:?}", self.color);
            }
            return Err(e);
        }
        self.color = color;
        Ok(())
    }

    fn write(&mut self, color: Rgb) -> Result<(), P::Error> {
        for (channel, duty) in self.channels.iter_mut().zip(color.duty_fractions()) {
            channel.set_duty_fraction(duty)?;
        }
        Ok(())
    }

    /// Last color written.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Drive all channels dark.
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set_color(Rgb::BLACK)
    }

    /// Stop all three channels.
    pub fn disable(&mut self) -> Result<(), P::Error> {
        for channel in &mut self.channels {
            channel.disable()?;
        }
        Ok(())
    }

    /// The red, green and blue channels.
    pub fn channels(&self) -> &[P; 3] {
        &self.channels
    }
}

/// Piezo buzzer on one PWM channel.
///
/// Pitch is the PWM frequency; a sounding note uses a fixed duty (50% by
/// default), silence is duty 0.
pub struct Buzzer<P: PwmChannel> {
    pwm: P,
    duty: f32,
    frequency_hz: Option<u32>,
}

impl<P: PwmChannel> Buzzer<P> {
    /// Silent buzzer on `pwm`, sounding at `duty` when on.
    pub fn new(mut pwm: P, duty: f32) -> Result<Self, P::Error> {
        pwm.off()?;
        Ok(Self {
            pwm,
            duty: duty.clamp(0.0, 1.0),
            frequency_hz: None,
        })
    }

    /// Sound at `hz`.
    pub fn tone(&mut self, hz: u32) -> Result<(), P::Error> {
        self.pwm.set_frequency(hz)?;
        self.pwm.set_duty_fraction(self.duty)?;
        self.frequency_hz = Some(hz);
        Ok(())
    }

    /// Go silent.
    pub fn silence(&mut self) -> Result<(), P::Error> {
        self.pwm.off()?;
        self.frequency_hz = None;
        Ok(())
    }

    /// Carry out a [`ToneCommand`].
    pub fn apply(&mut self, command: ToneCommand) -> Result<(), P::Error> {
        match command {
            ToneCommand::On(hz) => self.tone(hz),
            ToneCommand::Off => self.silence(),
        }
    }

    /// Stop the channel.
    pub fn disable(&mut self) -> Result<(), P::Error> {
        self.frequency_hz = None;
        self.pwm.disable()
    }

    /// Frequency currently sounding.
    pub fn frequency(&self) -> Option<u32> {
        self.frequency_hz
    }

    /// The underlying channel.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockPwm;

    fn led() -> RgbLed<MockPwm> {
        RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap()
    }

    #[test]
    fn led_starts_dark_at_frequency() {
        let led = led();
        for channel in led.channels() {
            assert_eq!(channel.frequency_hz, 1000);
            assert_eq!(channel.duty, 0.0);
        }
        assert_eq!(led.color(), Rgb::BLACK);
    }

    #[test]
    fn led_writes_every_channel() {
        let mut led = led();
        led.set_color(Rgb::YELLOW).unwrap();
        led.set_color(Rgb::YELLOW).unwrap();
        for channel in led.channels() {
            assert_eq!(channel.duty_writes, 3);
        }
        assert_eq!(led.color(), Rgb::YELLOW);
    }

    #[test]
    fn led_keeps_old_color_when_a_channel_fails() {
        let mut led = led();
        led.set_color(Rgb::new(10, 20, 30)).unwrap();

        let green = led.channels()[1].fault();
        green.set(true);
        assert!(led.set_color(Rgb::new(255, 255, 255)).is_err());

        // red was written, then put back
        let [r, _, b] = led.channels();
        assert!((r.duty - 10.0 / 255.0).abs() < 1e-6);
        assert!((b.duty - 30.0 / 255.0).abs() < 1e-6);
        assert_eq!(led.color(), Rgb::new(10, 20, 30));

        green.set(false);
        led.set_color(Rgb::new(255, 255, 255)).unwrap();
        assert_eq!(led.color(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn led_disable() {
        let mut led = led();
        led.set_color(Rgb::CYAN).unwrap();
        led.off().unwrap();
        led.disable().unwrap();
        assert!(led.channels().iter().all(|c| !c.enabled && c.duty == 0.0));
    }

    #[test]
    fn buzzer_tone_and_silence() {
        let mut buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
        assert_eq!(buzzer.frequency(), None);

        buzzer.apply(ToneCommand::On(784)).unwrap();
        assert_eq!(buzzer.pwm().frequency_hz, 784);
        assert_eq!(buzzer.pwm().duty, 0.5);
        assert_eq!(buzzer.frequency(), Some(784));

        buzzer.apply(ToneCommand::Off).unwrap();
        assert_eq!(buzzer.pwm().duty, 0.0);
        assert_eq!(buzzer.frequency(), None);
    }

    #[test]
    fn buzzer_duty_clamped() {
        let mut buzzer = Buzzer::new(MockPwm::new(), 3.0).unwrap();
        buzzer.tone(440).unwrap();
        assert_eq!(buzzer.pwm().duty, 1.0);
    }
}
