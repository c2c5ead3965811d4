//! Settings persistence abstraction.

use crate::store::PersistedSnapshot;

/// Load/save of the small persisted settings record.
///
/// The panel reads the snapshot once at startup and writes it after every
/// mode switch and power toggle. Failures never stop the panel: a failed
/// load falls back to defaults, a failed save is logged and ignored.
///
/// # Example
///
/// ```rust
/// use rs_rgbknob::traits::SettingsStore;
/// use rs_rgbknob::hal::MemoryStore;
/// use rs_rgbknob::store::PersistedSnapshot;
///
/// let mut store = MemoryStore::new();
/// assert_eq!(store.load().unwrap(), None);
///
/// let snapshot = PersistedSnapshot::default();
/// store.save(&snapshot).unwrap();
/// assert_eq!(store.load().unwrap(), Some(snapshot));
/// ```
pub trait SettingsStore {
    /// Error type for storage operations.
    type Error: core::fmt::Debug;

    /// Read the stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<PersistedSnapshot>, Self::Error>;

    /// Replace the stored snapshot.
    fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), Self::Error>;
}
