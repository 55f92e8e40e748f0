//! Persisted picker snapshot

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PickerError, Result};

/// The only state that survives a save/restore cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub time_in_millis: i64,
}

impl SavedState {
    pub fn capture(time_in_millis: u64) -> Self {
        Self {
            time_in_millis: i64::try_from(time_in_millis).unwrap_or(i64::MAX),
        }
    }

    /// Millis to restore, `None` for a snapshot of no input
    pub fn restorable_millis(&self) -> Option<u64> {
        u64::try_from(self.time_in_millis).ok().filter(|&millis| millis > 0)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PickerError::Snapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PickerError::Snapshot(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PickerError::Snapshot(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| PickerError::Snapshot(format!("{}: {}", path.display(), e)))
    }
}
