//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `embedded`: Adapters for any `embedded-hal` 1.0 HAL (requires `embedded-hal` feature)
//! - `esp32`: ESP32 LEDC, GPIO, timer and NVS (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use embedded::{EhInput, EhPwm, EhPwmError};
