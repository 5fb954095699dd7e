use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::error::RecorderError;
use crate::models::recording::{RecordingId, RecordingMetadata};

/// Current on-disk schema version of the collection index.
pub const SCHEMA_VERSION: u32 = 1;

/// The record collection as persisted in `<collection>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreIndex {
    pub version: u32,
    /// Next id to assign. Only ever grows.
    pub next_id: u64,
    pub records: Vec<RecordingMetadata>,
}

impl StoreIndex {
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }

    pub fn allocate_id(&mut self) -> RecordingId {
        let id = RecordingId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn find(&self, id: RecordingId) -> Option<&RecordingMetadata> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Remove a record, returning it if present.
    pub fn remove(&mut self, id: RecordingId) -> Option<RecordingMetadata> {
        let position = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(position))
    }
}

impl Default for StoreIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the index at `path`; `None` when it doesn't exist yet.
pub fn read_index(path: &Path) -> Result<Option<StoreIndex>, RecorderError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to read index: {}", e))
        })?;
    let index: StoreIndex = serde_json::from_str(&json)
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to parse index: {}", e))
        })?;
    Ok(Some(index))
}

/// Replace the index at `path` atomically (temp file, then rename).
pub fn write_index(index: &StoreIndex, path: &Path) -> Result<(), RecorderError> {
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to serialize index: {}", e))
        })?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to create index: {}", e))
        })?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to write index: {}", e))
        })?;
    drop(file);

    fs::rename(&tmp_path, path)
        .map_err(|e| {
            RecorderError::StoreTransactionFailed(format!("failed to commit index: {}", e))
        })?;
    Ok(())
}
