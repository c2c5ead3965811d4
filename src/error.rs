//! Error types for the control panel.

use crate::interaction::{PanelEvent, PowerState};

/// Errors raised by panel construction and the state machine.
///
/// Hardware write failures are not listed here: they propagate as the
/// driver's own associated error type, like every other PWM call.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PanelError {
    /// A configuration value is unusable (empty palette, zero step count, ...).
    ///
    /// Fatal: startup must abort.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),

    /// A driver was given the wrong number of output channels.
    ///
    /// Fatal: startup must abort.
    #[error("{component} requires exactly {expected} channels, got {actual}")]
    ChannelCount {
        /// Driver that rejected the channels.
        component: &'static str,
        /// Number of channels the driver needs.
        expected: usize,
        /// Number of channels that were supplied.
        actual: usize,
    },

    /// Settings persistence failed. Non-fatal; defaults are kept.
    #[error("settings store error: {0}")]
    Io(&'static str),

    /// The state machine reached a combination it has no rule for.
    ///
    /// Indicates a programming defect.
    #[error("no transition from {power:?} on {event:?}")]
    InvalidTransition {
        /// Power state when the event arrived.
        power: PowerState,
        /// The offending event.
        event: PanelEvent,
    },
}

/// Report a defect: panic in debug builds, log and carry on in release.
pub(crate) fn report_defect(error: PanelError) {
    debug_assert!(false, "{}", error);
    log::error!("{}", error);
}
