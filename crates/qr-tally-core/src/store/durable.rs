use super::backend::KvBackend;
use crate::error::Error;
use crate::model::{ScanEntry, Settings, DEFAULT_SESSION_LABEL};
use std::sync::Arc;
use tracing::{debug, warn};

pub const ROWS_KEY: &str = "rows_v1";
pub const SETTINGS_KEY: &str = "settings_v1";
pub const SESSION_KEY: &str = "session_name_v1";

/// Typed access to the three independent slots: scan log, settings and
/// session label.
///
/// Loads never fail. A missing key, a backend read error or an undecodable
/// value all yield the slot's default, with the latter two logged.
#[derive(Clone)]
pub struct DurableStore {
    backend: Arc<dyn KvBackend>,
}

impl DurableStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn load_rows(&self) -> Vec<ScanEntry> {
        self.load_slot(ROWS_KEY, |bytes| Ok(bincode::deserialize(bytes)?))
            .unwrap_or_default()
    }

    pub fn save_rows(&self, rows: &[ScanEntry]) -> Result<(), Error> {
        let bytes = bincode::serialize(rows)?;
        self.backend.put(ROWS_KEY, &bytes)?;
        debug!("Saved {} rows", rows.len());
        Ok(())
    }

    /// Stored fields are merged over the defaults one by one; a field with a
    /// bad value falls back alone.
    pub fn load_settings(&self) -> Settings {
        self.load_slot(SETTINGS_KEY, |bytes| {
            let stored: serde_json::Value = serde_json::from_slice(bytes)?;
            Ok(Settings::merge_stored(&stored))
        })
        .unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), Error> {
        let bytes = serde_json::to_vec(settings)?;
        self.backend.put(SETTINGS_KEY, &bytes)
    }

    pub fn load_session_label(&self) -> String {
        self.load_slot(SESSION_KEY, |bytes| Ok(bincode::deserialize(bytes)?))
            .unwrap_or_else(|| DEFAULT_SESSION_LABEL.to_string())
    }

    pub fn save_session_label(&self, label: &str) -> Result<(), Error> {
        let bytes = bincode::serialize(label)?;
        self.backend.put(SESSION_KEY, &bytes)
    }

    fn load_slot<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&[u8]) -> Result<T, Error>,
    ) -> Option<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No value stored for '{}', using default", key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read '{}', using default: {}", key, e);
                return None;
            }
        };
        match decode(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to decode '{}', using default: {}", key, e);
                None
            }
        }
    }
}
