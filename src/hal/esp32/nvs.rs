//! Settings persisted to the NVS flash partition.
//!
//! The snapshot is stored as the same JSON document the file store writes,
//! under a single key.

use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use esp_idf_svc::sys::EspError;

use crate::store::PersistedSnapshot;
use crate::traits::SettingsStore;

const NAMESPACE: &str = "rgbknob";
const KEY: &str = "led_state";

/// Errors from [`NvsStore`].
#[derive(Debug, thiserror::Error)]
pub enum NvsStoreError {
    /// NVS rejected the operation.
    #[error("NVS error: {0}")]
    Nvs(#[from] EspError),
    /// The stored bytes are not a valid snapshot.
    #[error("stored settings are malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// [`SettingsStore`] on the default NVS partition.
pub struct NvsStore {
    nvs: EspNvs<NvsDefault>,
}

impl NvsStore {
    /// Open the panel's namespace for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be opened.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, NvsStoreError> {
        Ok(Self {
            nvs: EspNvs::new(partition, NAMESPACE, true)?,
        })
    }
}

impl SettingsStore for NvsStore {
    type Error = NvsStoreError;

    fn load(&mut self) -> Result<Option<PersistedSnapshot>, NvsStoreError> {
        let mut buf = [0u8; 128];
        match self.nvs.get_raw(KEY, &mut buf)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), NvsStoreError> {
        let json = serde_json::to_vec(snapshot)?;
        self.nvs.set_raw(KEY, &json)?;
        Ok(())
    }
}
