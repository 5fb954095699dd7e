use std::path::PathBuf;

use super::media::GENERIC_CONTAINER_MIME;
use crate::traits::encryptor::BlobEncryptor;

/// Configuration for a `RecordingStore`.
#[derive(Clone)]
pub struct StoreConfiguration {
    /// Directory holding the named database (default: current directory).
    pub root_directory: PathBuf,

    /// Database name; becomes a directory under `root_directory`.
    pub database_name: String,

    /// Record collection name; becomes `<collection>.json` in the database.
    pub collection: String,

    /// Optional encryptor applied to blobs at rest.
    pub encryptor: Option<Box<dyn BlobEncryptor>>,
}

impl StoreConfiguration {
    pub fn in_directory(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
            ..Default::default()
        }
    }

    pub fn with_encryptor(mut self, encryptor: Box<dyn BlobEncryptor>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_directory.join(&self.database_name)
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_name("database name", &self.database_name)?;
        validate_name("collection name", &self.collection)?;
        Ok(())
    }
}

fn validate_name(what: &str, name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{} must not be empty", what));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!("{} is not a plain name: {}", what, name));
    }
    Ok(())
}

impl Default for StoreConfiguration {
    fn default() -> Self {
        Self {
            root_directory: PathBuf::from("."),
            database_name: "RecordingsDB".into(),
            collection: "recordings".into(),
            encryptor: None,
        }
    }
}

/// Configuration for recorders created by the studio workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfiguration {
    /// Requested recorder type (default: `video/webm;codecs=vp9,opus`).
    pub preferred_mime_type: String,

    /// Used when the platform rejects the preferred type.
    pub fallback_mime_type: String,

    /// Prefix of generated filenames (default: `recording`).
    pub filename_prefix: String,

    /// Persist recordings that produced no data (default: false).
    pub save_empty_recordings: bool,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.preferred_mime_type.is_empty() {
            return Err("preferred mime type must not be empty".into());
        }
        if self.fallback_mime_type.is_empty() {
            return Err("fallback mime type must not be empty".into());
        }
        if self.filename_prefix.contains(['/', '\\']) {
            return Err(format!(
                "filename prefix contains a path separator: {}",
                self.filename_prefix
            ));
        }
        Ok(())
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            preferred_mime_type: "video/webm;codecs=vp9,opus".into(),
            fallback_mime_type: GENERIC_CONTAINER_MIME.into(),
            filename_prefix: "recording".into(),
            save_empty_recordings: false,
        }
    }
}
