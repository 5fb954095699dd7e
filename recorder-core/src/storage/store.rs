use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use crate::models::config::StoreConfiguration;
use crate::models::error::RecorderError;
use crate::models::media::MediaBlob;
use crate::models::recording::{iso_timestamp, Recording, RecordingId, RecordingMetadata};
use crate::storage::blob_file::{sha256_hex, BlobFiles};
use crate::storage::index::{read_index, write_index, StoreIndex, SCHEMA_VERSION};

/// Local persistent collection of recordings.
///
/// One named database directory holding one collection:
/// ```text
/// <root>/<database>/<collection>.json   index: schema version, next id, metadata
/// <root>/<database>/blobs/<id>.blob     payloads (optionally encrypted)
/// ```
/// Each operation runs in its own transaction; transactions are serialized
/// within the process and the index is replaced atomically on commit.
pub struct RecordingStore {
    index_path: PathBuf,
    blobs: BlobFiles,
    transaction_lock: Mutex<()>,
}

impl RecordingStore {
    /// Open (creating if needed) the database described by `config`.
    pub fn open(config: StoreConfiguration) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::StoreOpenFailed)?;

        let database_path = config.database_path();
        let blob_directory = database_path.join("blobs");
        fs::create_dir_all(&blob_directory)
            .map_err(|e| {
                RecorderError::StoreOpenFailed(format!(
                    "failed to create database directory: {}",
                    e
                ))
            })?;

        let index_path = database_path.join(format!("{}.json", config.collection));
        let index = read_index(&index_path)
            .map_err(|e| RecorderError::StoreOpenFailed(e.to_string()))?;
        match index {
            Some(index) if index.version != SCHEMA_VERSION => {
                return Err(RecorderError::StoreOpenFailed(format!(
                    "unsupported schema version {} (expected {})",
                    index.version, SCHEMA_VERSION
                )));
            }
            Some(index) => {
                log::info!(
                    "Opened store {} with {} recordings",
                    database_path.display(),
                    index.records.len()
                );
            }
            None => {
                write_index(&StoreIndex::new(), &index_path)
                    .map_err(|e| RecorderError::StoreOpenFailed(e.to_string()))?;
                log::info!("Created store {}", database_path.display());
            }
        }

        Ok(Self {
            index_path,
            blobs: BlobFiles::new(blob_directory, config.encryptor),
            transaction_lock: Mutex::new(()),
        })
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn is_encrypted(&self) -> bool {
        self.blobs.is_encrypted()
    }

    /// Store `blob` as a new record and return its id.
    ///
    /// Size and mime type come from the blob itself.
    pub fn put(&self, blob: &MediaBlob, filename: &str) -> Result<RecordingId, RecorderError> {
        let metadata = self.transaction(|index| {
            let id = index.allocate_id();
            let metadata = RecordingMetadata {
                id,
                filename: filename.to_string(),
                mime_type: blob.mime_type().to_string(),
                size: blob.len() as u64,
                timestamp: iso_timestamp(Utc::now()),
                checksum: sha256_hex(blob.data()),
            };

            self.blobs.write(id, blob.data())?;
            index.records.push(metadata.clone());
            Ok(metadata)
        })
        .map_err(|e| {
            log::error!("Failed to store recording {}: {}", filename, e);
            e
        })?;

        log::info!(
            "Stored recording {} as {} ({} bytes, {})",
            metadata.id,
            metadata.filename,
            metadata.size,
            metadata.mime_type
        );
        Ok(metadata.id)
    }

    /// Every record with its blob, in insertion order.
    ///
    /// Holds the transaction lock while blobs load, so a concurrent delete is
    /// either fully visible or not at all.
    pub fn list_all(&self) -> Result<Vec<Recording>, RecorderError> {
        let _guard = self.transaction_lock.lock();
        self.read_current()?
            .records
            .into_iter()
            .map(|metadata| self.load(metadata))
            .collect()
    }

    /// Every record without loading blobs, in insertion order.
    pub fn list_metadata(&self) -> Result<Vec<RecordingMetadata>, RecorderError> {
        let _guard = self.transaction_lock.lock();
        Ok(self.read_current()?.records)
    }

    pub fn get(&self, id: RecordingId) -> Result<Option<Recording>, RecorderError> {
        let _guard = self.transaction_lock.lock();
        let metadata = self.read_current()?.find(id).cloned();
        metadata.map(|m| self.load(m)).transpose()
    }

    /// Remove the record with `id`. A missing id is a no-op.
    pub fn delete_by_id(&self, id: RecordingId) -> Result<(), RecorderError> {
        let removed = self.transaction(|index| Ok(index.remove(id)))?;

        match removed {
            Some(metadata) => {
                // The index no longer references the blob; a leftover file is harmless.
                if let Err(e) = self.blobs.remove(id) {
                    log::warn!("Deleted recording {} but kept its blob file: {}", id, e);
                }
                log::info!("Deleted recording {} ({})", id, metadata.filename);
            }
            None => log::debug!("Delete of missing recording {} ignored", id),
        }
        Ok(())
    }

    /// Close the store. Dropping it has the same effect.
    pub fn close(self) {
        log::debug!("Closed store {}", self.index_path.display());
    }

    fn read_current(&self) -> Result<StoreIndex, RecorderError> {
        Ok(read_index(&self.index_path)?.unwrap_or_default())
    }

    fn load(&self, metadata: RecordingMetadata) -> Result<Recording, RecorderError> {
        let data = self.blobs.read(metadata.id)?;
        let checksum = sha256_hex(&data);
        if checksum != metadata.checksum {
            return Err(RecorderError::StoreTransactionFailed(format!(
                "checksum mismatch for recording {}",
                metadata.id
            )));
        }
        let blob = MediaBlob::new(data, metadata.mime_type.clone());
        Ok(Recording { metadata, blob })
    }

    /// Run `f` against the current index and commit the result.
    ///
    /// Blob files written by `f` for ids that don't make it into the committed
    /// index are removed again.
    fn transaction<R>(
        &self,
        f: impl FnOnce(&mut StoreIndex) -> Result<R, RecorderError>,
    ) -> Result<R, RecorderError> {
        let _guard = self.transaction_lock.lock();
        let mut index = self.read_current()?;
        let first_new_id = index.next_id;

        let result = f(&mut index).and_then(|value| {
            write_index(&index, &self.index_path)?;
            Ok(value)
        });

        if result.is_err() {
            for id in first_new_id..index.next_id {
                if let Err(e) = self.blobs.remove(RecordingId(id)) {
                    log::warn!("Failed to clean up blob {} after aborted transaction: {}", id, e);
                }
            }
        }
        result
    }
}
