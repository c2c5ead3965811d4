//! Trait definitions for hardware abstraction, persistence and easing.
//!
//! This module defines the core abstractions that allow rs-rgbknob to:
//! - Run on different hardware (ESP32, any embedded-hal target, desktop mock)
//! - Persist user settings to any backing store
//! - Shape color fades with different curves
//!
//! # Submodules
//!
//! - `hardware`: PWM outputs, digital inputs, clock, delay
//! - `storage`: settings snapshot persistence
//! - `easing`: fade curves used by the transition engine
//!
//! # Hardware Abstraction
//!
//! - [`PwmChannel`]: one PWM output (`set_frequency`, `set_duty_fraction`, `disable`)
//! - [`DigitalInput`]: one polled input line
//! - [`Clock`]: Time source for `no_std` environments
//! - [`Delay`]: Tick sleep for the cooperative loop

pub mod easing;
pub mod hardware;
pub mod storage;

pub use easing::*;
pub use hardware::*;
pub use storage::*;
