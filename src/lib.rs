//! # rs-rgbknob
//!
//! Firmware core for a rotary-encoder control panel: a knob with a push
//! button selects and dims the color of an RGB LED, a piezo buzzer gives
//! audible feedback, and the user's choice survives a power cycle.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for PWM outputs, polled inputs, clock and delay
//! - **Debounced input**: Quadrature decoding and short/long press classification
//! - **Two interaction modes**: Walk the palette with blending, or dim the current color
//! - **Non-blocking feedback**: Fades and melodies advance one step per tick
//! - **Persistence**: Mode, color, intensity and power survive restarts
//! - **Servo bank**: Four hobby servos positioned from the encoder count
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware, storage and easing abstractions
//! - `encoder` / `button` - Input decoding from raw line levels
//! - `interaction` - Pure state machine turning events into effects
//! - `transition` - Color fades and tone playback over time
//! - `panel` - Coordinator that applies effects to the drivers
//! - `scheduler` - Cooperative tick loop over the inputs and the panel
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_rgbknob::{
//!     Panel, PanelConfig, PanelEvent, Rgb,
//!     drivers::{Buzzer, RgbLed},
//!     hal::{MemoryStore, MockPwm},
//! };
//!
//! let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
//! let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
//! let mut panel = Panel::new(led, buzzer, MemoryStore::new(), PanelConfig::default()).unwrap();
//! panel.update(0).unwrap();
//!
//! // Short press: switch to dim mode
//! panel.handle(PanelEvent::ShortPress, 100).unwrap();
//! assert_eq!(panel.led().color(), Rgb::RED);
//!
//! // Settings were saved on the mode switch
//! assert_eq!(panel.store().saves, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Push-button sampling and gesture classification.
pub mod button;
/// RGB colors and the color palette.
pub mod color;
/// Panel configuration with validated defaults.
pub mod config;
/// RGB LED and buzzer drivers over PWM channels.
pub mod drivers;
/// Quadrature decoding of the rotary encoder.
pub mod encoder;
/// Error types.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Interaction state machine: modes, power and color selection.
pub mod interaction;
/// Coordinator tying the state machine to drivers and storage.
pub mod panel;
/// Cooperative tick loop.
pub mod scheduler;
/// Hobby servo bank.
pub mod servo;
/// Persisted settings snapshot and stores.
pub mod store;
/// Notes, melodies and non-blocking tone playback.
pub mod tone;
/// Core traits for hardware abstraction, storage and easing.
pub mod traits;
/// Color fades and per-tick output frames.
pub mod transition;

// Re-exports for convenience
pub use button::{ButtonEvent, ButtonMonitor, GestureClassifier};
pub use color::{Palette, Rgb};
pub use config::PanelConfig;
pub use drivers::{Buzzer, RgbLed};
pub use encoder::{Direction, EncoderMonitor, QuadratureDecoder, RotationEvent};
pub use error::PanelError;
pub use interaction::{
    Effect, InteractionState, InteractionStateMachine, Mode, PanelEvent, PowerState, Reaction,
};
pub use panel::{Panel, PanelStatus};
pub use scheduler::PanelRunner;
pub use servo::{ServoBank, ServoSweep};
pub use store::PersistedSnapshot;
pub use tone::{Melody, Note, ToneCommand, TonePlayer};
pub use traits::{
    // Hardware
    Clock,
    Delay,
    DigitalInput,
    PwmChannel,
    // Storage
    SettingsStore,
    // Easing
    Curve,
    EaseInOut,
    Easing,
    Immediate,
    Linear,
};
pub use transition::{ColorFade, Frame, TransitionEngine};

#[cfg(feature = "file-store")]
pub use store::FileStore;
