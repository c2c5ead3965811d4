//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every hardware and storage trait,
//! enabling development and testing on desktop without a board.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockPwm`] | [`PwmChannel`] | Records frequency/duty writes, can be made to fail |
//! | [`MockInput`] | [`DigitalInput`] | Scripted or remotely set levels |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockDelay`] | [`Delay`] | Advances a [`MockClock`] instead of sleeping |
//! | [`MemoryStore`] | [`SettingsStore`] | In-memory snapshot, optional failure |
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::color::Rgb;
//! use rs_rgbknob::drivers::RgbLed;
//! use rs_rgbknob::hal::MockPwm;
//!
//! let mut led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
//! led.set_color(Rgb::GREEN).unwrap();
//!
//! let [r, g, _] = led.channels();
//! assert_eq!(r.duty, 0.0);
//! assert_eq!(g.duty, 1.0);
//! ```
//!
//! [`PwmChannel`]: crate::traits::PwmChannel
//! [`DigitalInput`]: crate::traits::DigitalInput
//! [`Clock`]: crate::traits::Clock
//! [`Delay`]: crate::traits::Delay
//! [`SettingsStore`]: crate::traits::SettingsStore

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::Cell;

use crate::error::PanelError;
use crate::store::PersistedSnapshot;
use crate::traits::{Clock, Delay, DigitalInput, PwmChannel, SettingsStore};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock PWM channel for testing.
///
/// Records the last frequency and duty written. Use the public fields to
/// inspect state after test operations.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::hal::MockPwm;
/// use rs_rgbknob::traits::PwmChannel;
///
/// let mut pwm = MockPwm::new();
/// pwm.set_frequency(50).unwrap();
/// pwm.set_duty_fraction(1.7).unwrap();
///
/// assert_eq!(pwm.frequency_hz, 50);
/// assert_eq!(pwm.duty, 1.0); // clamped
/// assert_eq!(pwm.duty_writes, 1);
/// assert!(pwm.enabled);
/// ```
#[derive(Debug, Default)]
pub struct MockPwm {
    /// Last frequency written.
    pub frequency_hz: u32,
    /// Last duty written (0.0 to 1.0).
    pub duty: f32,
    /// Number of `set_duty_fraction` calls.
    pub duty_writes: usize,
    /// Whether the channel is driving its pin.
    pub enabled: bool,
    fault: Rc<Cell<bool>>,
}

impl MockPwm {
    /// Creates a disabled mock channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for making writes fail later.
    pub fn fault(&self) -> MockFault {
        MockFault(self.fault.clone())
    }

    fn check(&self) -> Result<(), ()> {
        if self.fault.get() {
            Err(())
        } else {
            Ok(())
        }
    }
}

/// Switches a [`MockPwm`] between working and failing every write.
#[derive(Clone, Debug)]
pub struct MockFault(Rc<Cell<bool>>);

impl MockFault {
    /// Fail (`true`) or accept (`false`) subsequent writes.
    pub fn set(&self, failing: bool) {
        self.0.set(failing);
    }
}

impl PwmChannel for MockPwm {
    type Error = ();

    fn set_frequency(&mut self, hz: u32) -> Result<(), ()> {
        self.check()?;
        self.frequency_hz = hz;
        self.enabled = true;
        Ok(())
    }

    fn set_duty_fraction(&mut self, duty: f32) -> Result<(), ()> {
        self.check()?;
        self.duty = duty.clamp(0.0, 1.0);
        self.duty_writes += 1;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ()> {
        self.check()?;
        self.duty = 0.0;
        self.enabled = false;
        Ok(())
    }
}

/// Mock input line for testing.
///
/// Returns scripted levels one per read, then holds the last level. The
/// level can also be changed from outside through a [`MockLine`] handle,
/// which keeps working after the input has been moved into a monitor.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::hal::MockInput;
/// use rs_rgbknob::traits::DigitalInput;
///
/// let mut input = MockInput::from_levels(&[true, false]);
/// let line = input.line();
///
/// assert!(input.read());
/// assert!(!input.read());
/// assert!(!input.read()); // holds
///
/// line.set(true);
/// assert!(input.read());
/// ```
#[derive(Debug)]
pub struct MockInput {
    script: VecDeque<bool>,
    level: Rc<Cell<bool>>,
}

impl MockInput {
    /// Input held at `level`.
    pub fn new(level: bool) -> Self {
        Self {
            script: VecDeque::new(),
            level: Rc::new(Cell::new(level)),
        }
    }

    /// Input that plays back `levels`, then holds the last one.
    pub fn from_levels(levels: &[bool]) -> Self {
        let mut input = Self::new(levels.last().copied().unwrap_or(false));
        input.script.extend(levels.iter().copied());
        input
    }

    /// Queue more scripted levels.
    pub fn push_levels(&mut self, levels: &[bool]) {
        self.script.extend(levels.iter().copied());
    }

    /// Handle for changing the level later.
    pub fn line(&self) -> MockLine {
        MockLine(self.level.clone())
    }
}

impl DigitalInput for MockInput {
    fn read(&mut self) -> bool {
        if let Some(level) = self.script.pop_front() {
            self.level.set(level);
        }
        self.level.get()
    }
}

/// Remote control for a [`MockInput`].
#[derive(Clone, Debug)]
pub struct MockLine(Rc<Cell<bool>>);

impl MockLine {
    /// Set the level the input reads.
    pub fn set(&self, level: bool) {
        self.0.set(level);
    }

    /// Current level.
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

// ============================================================================
// Time Mocks
// ============================================================================

/// Mock clock for testing.
///
/// Time only moves when told to. Interior mutability lets a [`MockDelay`]
/// advance a clock that is also borrowed by the code under test.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::hal::MockClock;
/// use rs_rgbknob::traits::Clock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: Cell<u64>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

/// Delay that advances a [`MockClock`] and returns immediately.
#[derive(Debug)]
pub struct MockDelay<'a> {
    clock: &'a MockClock,
    /// Number of delays requested.
    pub calls: usize,
    /// Sum of all requested delays.
    pub total_ms: u64,
}

impl<'a> MockDelay<'a> {
    /// Delay driving `clock`.
    pub fn new(clock: &'a MockClock) -> Self {
        Self {
            clock,
            calls: 0,
            total_ms: 0,
        }
    }
}

impl Delay for MockDelay<'_> {
    async fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ms += ms as u64;
        self.clock.advance(ms as u64);
    }
}

/// Wall-clock time since creation, for desktop runs.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Clock starting at 0 now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

// ============================================================================
// Storage Mocks
// ============================================================================

/// In-memory settings store.
///
/// ```rust
/// use rs_rgbknob::hal::MemoryStore;
/// use rs_rgbknob::store::PersistedSnapshot;
/// use rs_rgbknob::traits::SettingsStore;
///
/// let mut store = MemoryStore::new().failing();
/// assert!(store.load().is_err());
/// assert!(store.save(&PersistedSnapshot::default()).is_err());
/// assert_eq!(store.saves, 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// The stored snapshot.
    pub snapshot: Option<PersistedSnapshot>,
    /// Number of successful saves.
    pub saves: usize,
    /// When set, every load and save fails.
    pub fail: bool,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding `snapshot`.
    pub fn with_snapshot(mut self, snapshot: PersistedSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Store whose operations all fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl SettingsStore for MemoryStore {
    type Error = PanelError;

    fn load(&mut self) -> Result<Option<PersistedSnapshot>, PanelError> {
        if self.fail {
            return Err(PanelError::Io("memory store unavailable"));
        }
        Ok(self.snapshot)
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), PanelError> {
        if self.fail {
            return Err(PanelError::Io("memory store unavailable"));
        }
        self.snapshot = Some(*snapshot);
        self.saves += 1;
        Ok(())
    }
}
