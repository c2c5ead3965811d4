//! Persisted settings record and the JSON file backend.
//!
//! The snapshot is written after every mode switch and power toggle and read
//! back once at startup. With the `serde` feature it serializes to the flat
//! JSON object the firmware has always used:
//!
//! ```json
//! {"mode": "color", "color_index": 2, "intensity": 128, "led_on": true}
//! ```
//!
//! Missing keys fall back to their defaults, so older files still load.

use crate::interaction::{Mode, PowerState};

/// Default location of the settings file.
pub const DEFAULT_STORE_PATH: &str = "led_state.json";

/// The subset of interaction state that survives a restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PersistedSnapshot {
    /// Active rotation mode.
    pub mode: Mode,
    /// Selected palette entry. May be out of range in a stale file.
    pub color_index: usize,
    /// Brightness, 0-255.
    pub intensity: u8,
    /// Whether the LED was lit.
    #[cfg_attr(feature = "serde", serde(rename = "led_on"))]
    pub power: PowerState,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            mode: Mode::Color,
            color_index: 0,
            intensity: 255,
            power: PowerState::On,
        }
    }
}

// ============================================================================
// File Store
// ============================================================================

#[cfg(feature = "file-store")]
pub use file::{FileStore, StoreError};

#[cfg(feature = "file-store")]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{PersistedSnapshot, DEFAULT_STORE_PATH};
    use crate::traits::SettingsStore;

    /// Errors from [`FileStore`].
    #[derive(Debug, thiserror::Error)]
    pub enum StoreError {
        /// Reading or writing the file failed.
        #[error("settings file I/O failed: {0}")]
        Io(#[from] std::io::Error),
        /// The file exists but is not a valid snapshot.
        #[error("settings file is malformed: {0}")]
        Format(#[from] serde_json::Error),
    }

    /// Stores the snapshot as a small JSON file.
    ///
    /// A missing file loads as `None`.
    ///
    /// ```rust,no_run
    /// use rs_rgbknob::store::{FileStore, PersistedSnapshot};
    /// use rs_rgbknob::traits::SettingsStore;
    ///
    /// let mut store = FileStore::default(); // led_state.json
    /// store.save(&PersistedSnapshot::default()).unwrap();
    /// ```
    #[derive(Clone, Debug)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// Store at `path`.
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Location of the backing file.
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Default for FileStore {
        fn default() -> Self {
            Self::new(DEFAULT_STORE_PATH)
        }
    }

    impl SettingsStore for FileStore {
        type Error = StoreError;

        fn load(&mut self) -> Result<Option<PersistedSnapshot>, StoreError> {
            let bytes = match std::fs::read(&self.path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            Ok(Some(serde_json::from_slice(&bytes)?))
        }

        fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), StoreError> {
            let json = serde_json::to_vec(snapshot)?;
            std::fs::write(&self.path, json)?;
            log::debug!("settings saved to {}", self.path.display());
            Ok(())
        }
    }
}
