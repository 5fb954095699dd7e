use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaBlob;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Store-assigned record identifier. Starts at 1, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordingId(pub u64);

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields of a stored recording, without its payload.
///
/// This is what the store's index persists for each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMetadata {
    pub id: RecordingId,
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    /// ISO-8601, UTC, millisecond precision.
    pub timestamp: String,
    /// SHA-256 hex digest of the plaintext blob.
    pub checksum: String,
}

impl RecordingMetadata {
    /// Size in mebibytes formatted to two decimals, e.g. `"1.50 MB"`.
    pub fn size_megabytes(&self) -> String {
        format!("{:.2} MB", self.size as f64 / BYTES_PER_MEGABYTE)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Calendar date of the timestamp, or the raw string if it doesn't parse.
    pub fn display_date(&self) -> String {
        match self.created_at() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => self.timestamp.clone(),
        }
    }
}

/// A persisted recording: metadata plus its blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub metadata: RecordingMetadata,
    pub blob: MediaBlob,
}

impl Recording {
    pub fn id(&self) -> RecordingId {
        self.metadata.id
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.metadata.mime_type
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    pub fn timestamp(&self) -> &str {
        &self.metadata.timestamp
    }
}

/// Current time as an ISO-8601 string, e.g. `2024-05-01T10:20:30.123Z`.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Filename for a new recording: `<prefix>-<timestamp>.<ext>` with `:` and
/// `.` in the timestamp replaced by `-`.
pub fn recording_filename(prefix: &str, now: DateTime<Utc>, extension: &str) -> String {
    let stamp = iso_timestamp(now).replace([':', '.'], "-");
    format!("{}-{}.{}", prefix, stamp, extension)
}
