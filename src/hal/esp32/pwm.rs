//! LEDC-backed PWM channels.
//!
//! Channels that share a timer (the three LED colors, the four servos) run
//! at whatever frequency that timer was configured for. A channel that owns
//! its timer (the buzzer) can retune it.

use esp_idf_hal::ledc::{
    config::TimerConfig, LedcDriver, LedcTimer, LedcTimerDriver, LowSpeed, Resolution,
};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::{EspError, ESP_ERR_NOT_SUPPORTED};

use crate::traits::PwmChannel;

/// Configure an LEDC timer.
///
/// # Errors
///
/// Returns an error if the timer cannot run at `frequency_hz` with the
/// requested resolution.
pub fn ledc_timer<'d, T>(
    timer: impl Peripheral<P = T> + 'd,
    frequency_hz: u32,
    resolution: Resolution,
) -> Result<LedcTimerDriver<'d, LowSpeed>, EspError>
where
    T: LedcTimer<SpeedMode = LowSpeed> + 'd,
{
    let config = TimerConfig::default()
        .frequency(frequency_hz.Hz())
        .resolution(resolution);
    LedcTimerDriver::new(timer, &config)
}

/// One LEDC output channel.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::ledc::{LedcDriver, Resolution};
/// use rs_rgbknob::hal::esp32::{ledc_timer, Esp32Pwm};
///
/// let timer = ledc_timer(peripherals.ledc.timer0, 1000, Resolution::Bits10)?;
/// let red = LedcDriver::new(peripherals.ledc.channel0, &timer, peripherals.pins.gpio25)?;
/// let red = Esp32Pwm::on_shared_timer(red, 1000);
/// ```
pub struct Esp32Pwm<'d> {
    driver: LedcDriver<'d>,
    timer: Option<LedcTimerDriver<'d, LowSpeed>>,
    frequency_hz: u32,
}

impl<'d> Esp32Pwm<'d> {
    /// Channel on a timer owned elsewhere, running at `frequency_hz`.
    ///
    /// The timer driver must stay alive as long as the channel.
    pub fn on_shared_timer(driver: LedcDriver<'d>, frequency_hz: u32) -> Self {
        Self {
            driver,
            timer: None,
            frequency_hz,
        }
    }

    /// Channel that owns `timer` and may change its frequency.
    pub fn with_own_timer(
        driver: LedcDriver<'d>,
        timer: LedcTimerDriver<'d, LowSpeed>,
        frequency_hz: u32,
    ) -> Self {
        Self {
            driver,
            timer: Some(timer),
            frequency_hz,
        }
    }
}

impl PwmChannel for Esp32Pwm<'_> {
    type Error = EspError;

    fn set_frequency(&mut self, hz: u32) -> Result<(), EspError> {
        if hz == self.frequency_hz {
            return Ok(());
        }
        match self.timer.as_mut() {
            Some(timer) => {
                timer.set_frequency(hz.Hz())?;
                self.frequency_hz = hz;
                Ok(())
            }
            None => {
                log::warn!(
                    "shared LEDC timer runs at {} Hz, cannot switch to {} Hz",
                    self.frequency_hz,
                    hz
                );
                Err(EspError::from_infallible::<ESP_ERR_NOT_SUPPORTED>())
            }
        }
    }

    fn set_duty_fraction(&mut self, duty: f32) -> Result<(), EspError> {
        let max = self.driver.get_max_duty();
        let raw = (duty.clamp(0.0, 1.0) * max as f32) as u32;
        self.driver.set_duty(raw)
    }

    fn disable(&mut self) -> Result<(), EspError> {
        self.driver.set_duty(0)?;
        self.driver.disable()
    }
}
