//! GPIO inputs with the internal pull-up enabled.

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use esp_idf_hal::sys::EspError;

use crate::hal::embedded::EhInput;

/// A pulled-up GPIO input usable as a [`DigitalInput`](crate::traits::DigitalInput).
pub type Esp32Input<'d> = EhInput<PinDriver<'d, AnyIOPin, Input>>;

/// Configure `pin` as an input with the internal pull-up.
///
/// KY-040 style encoders have open-drain outputs and the push button
/// shorts to ground, so all three lines need the pull-up.
///
/// # Errors
///
/// Returns an error if the pin cannot be configured.
pub fn pull_up_input<'d>(pin: AnyIOPin) -> Result<Esp32Input<'d>, EspError> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(EhInput::new(driver))
}
