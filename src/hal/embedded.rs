//! Adapters from `embedded-hal` 1.0 traits to the panel's hardware traits.
//!
//! Any HAL that implements `embedded_hal::digital::InputPin` and
//! `embedded_hal::pwm::SetDutyCycle` can drive the panel through these
//! wrappers. `SetDutyCycle` has no notion of frequency, so [`EhPwm`] is
//! built with the frequency its timer was configured for and refuses to
//! change it. That is fine for LED and servo channels; a buzzer needs a
//! HAL-specific channel that can retune.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::traits::{DigitalInput, PwmChannel};

/// [`DigitalInput`] over an `embedded-hal` input pin.
///
/// Read errors keep the previous level and are logged.
pub struct EhInput<T: InputPin> {
    pin: T,
    last: bool,
}

impl<T: InputPin> EhInput<T> {
    /// Wrap `pin`.
    pub fn new(pin: T) -> Self {
        Self { pin, last: false }
    }

    /// Give back the pin.
    pub fn release(self) -> T {
        self.pin
    }
}

impl<T: InputPin> DigitalInput for EhInput<T> {
    fn read(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => self.last = level,
            Err(e) => log::warn!("input read failed: {:?}", e),
        }
        self.last
    }
}

/// Errors from [`EhPwm`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EhPwmError<E: core::fmt::Debug> {
    /// The underlying channel rejected the write.
    #[error("PWM write failed: {0:?}")]
    Pwm(E),
    /// A different frequency was requested than the timer provides.
    #[error("PWM frequency is fixed at {fixed_hz} Hz, {requested_hz} Hz requested")]
    FixedFrequency {
        /// Frequency the timer runs at.
        fixed_hz: u32,
        /// Frequency that was asked for.
        requested_hz: u32,
    },
}

/// [`PwmChannel`] over an `embedded-hal` duty-cycle channel with a fixed
/// frequency.
pub struct EhPwm<T: SetDutyCycle> {
    channel: T,
    frequency_hz: u32,
}

impl<T: SetDutyCycle> EhPwm<T> {
    /// Wrap `channel`, whose timer runs at `frequency_hz`.
    pub fn new(channel: T, frequency_hz: u32) -> Self {
        Self {
            channel,
            frequency_hz,
        }
    }

    /// Give back the channel.
    pub fn release(self) -> T {
        self.channel
    }
}

impl<T: SetDutyCycle> PwmChannel for EhPwm<T> {
    type Error = EhPwmError<T::Error>;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        if hz == self.frequency_hz {
            Ok(())
        } else {
            Err(EhPwmError::FixedFrequency {
                fixed_hz: self.frequency_hz,
                requested_hz: hz,
            })
        }
    }

    fn set_duty_fraction(&mut self, duty: f32) -> Result<(), Self::Error> {
        let max = self.channel.max_duty_cycle();
        let raw = (duty.clamp(0.0, 1.0) * max as f32) as u16;
        self.channel.set_duty_cycle(raw).map_err(EhPwmError::Pwm)
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.channel
            .set_duty_cycle_fully_off()
            .map_err(EhPwmError::Pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as DigitalErrorType;
    use embedded_hal::pwm::ErrorType as PwmErrorType;

    struct Pin(bool);

    impl DigitalErrorType for Pin {
        type Error = Infallible;
    }

    impl InputPin for Pin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    struct Channel {
        raw: u16,
    }

    impl PwmErrorType for Channel {
        type Error = Infallible;
    }

    impl SetDutyCycle for Channel {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.raw = duty;
            Ok(())
        }
    }

    #[test]
    fn input_reads_pin_level() {
        let mut input = EhInput::new(Pin(true));
        assert!(input.read());
        assert!(!EhInput::new(Pin(false)).read());
    }

    #[test]
    fn duty_scales_to_channel_range() {
        let mut pwm = EhPwm::new(Channel { raw: 0 }, 1000);
        pwm.set_duty_fraction(0.25).unwrap();
        assert_eq!(pwm.channel.raw, 250);

        pwm.disable().unwrap();
        assert_eq!(pwm.release().raw, 0);
    }

    #[test]
    fn frequency_is_fixed() {
        let mut pwm = EhPwm::new(Channel { raw: 0 }, 50);
        assert!(pwm.set_frequency(50).is_ok());
        assert_eq!(
            pwm.set_frequency(440),
            Err(EhPwmError::FixedFrequency {
                fixed_hz: 50,
                requested_hz: 440
            })
        );
    }
}
