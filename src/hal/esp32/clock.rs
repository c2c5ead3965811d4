//! Monotonic clock from the ESP-IDF high-resolution timer.

use crate::traits::Clock as PanelClock;

/// Milliseconds since boot, read from `esp_timer`.
///
/// Zero-sized; copies all read the same timer.
///
/// ```ignore
/// use rs_rgbknob::hal::esp32::Esp32Clock;
/// use rs_rgbknob::traits::Clock;
///
/// let boot_ms = Esp32Clock::new().now_ms();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    /// Handle to the boot timer.
    #[inline]
    pub const fn new() -> Self {
        Esp32Clock
    }
}

impl PanelClock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the IDF is up
        let boot_us = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        boot_us.max(0) as u64 / 1_000
    }
}
