use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::RecorderError;
use crate::models::recording::RecordingId;
use crate::traits::encryptor::BlobEncryptor;

/// Blob payload files of one database, with optional encryption at rest.
///
/// ## File Format
///
/// **Plaintext (no encryptor):** the blob bytes as-is.
///
/// **Encrypted (with encryptor):**
/// ```text
/// [sealed box: 12-byte nonce | ciphertext | 16-byte tag]
/// ```
pub struct BlobFiles {
    directory: PathBuf,
    encryptor: Option<Box<dyn BlobEncryptor>>,
}

impl BlobFiles {
    pub fn new(directory: PathBuf, encryptor: Option<Box<dyn BlobEncryptor>>) -> Self {
        Self { directory, encryptor }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryptor.is_some()
    }

    pub fn path_for(&self, id: RecordingId) -> PathBuf {
        self.directory.join(format!("{}.blob", id.0))
    }

    /// Write the payload for `id`, sealing it first when encrypting.
    pub fn write(&self, id: RecordingId, data: &[u8]) -> Result<(), RecorderError> {
        let payload = match &self.encryptor {
            Some(encryptor) => encryptor
                .encrypt(data)
                .map_err(|e| {
                    RecorderError::EncryptionFailed(format!("blob encryption failed: {}", e))
                })?,
            None => data.to_vec(),
        };

        let path = self.path_for(id);
        let mut file = fs::File::create(&path)
            .map_err(|e| {
                RecorderError::StoreTransactionFailed(format!("failed to create blob file: {}", e))
            })?;
        file.write_all(&payload)
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                RecorderError::StoreTransactionFailed(format!("failed to write blob: {}", e))
            })?;
        Ok(())
    }

    /// Read and, when encrypting, open the payload for `id`.
    pub fn read(&self, id: RecordingId) -> Result<Vec<u8>, RecorderError> {
        let payload = fs::read(self.path_for(id))
            .map_err(|e| {
                RecorderError::StoreTransactionFailed(format!("failed to read blob {}: {}", id, e))
            })?;

        match &self.encryptor {
            Some(encryptor) => encryptor
                .decrypt(&payload)
                .map_err(|e| {
                    RecorderError::EncryptionFailed(format!("blob {} decryption failed: {}", id, e))
                }),
            None => Ok(payload),
        }
    }

    /// Remove the payload for `id`. A missing file is not an error.
    pub fn remove(&self, id: RecordingId) -> Result<(), RecorderError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RecorderError::StoreTransactionFailed(format!(
                "failed to remove blob {}: {}",
                id, e
            ))),
        }
    }
}

/// SHA-256 hex digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct XorEncryptor;

    impl BlobEncryptor for XorEncryptor {
        fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, String> {
            // Simple test encryptor: 12 fake nonce bytes + xored data + 16 fake tag bytes
            let mut sealed = vec![0xAA; 12];
            sealed.extend(data.iter().map(|b| b ^ 0x5A));
            sealed.extend_from_slice(&[0xBB; 16]);
            Ok(sealed)
        }

        fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, String> {
            if sealed.len() < 28 {
                return Err("sealed blob too short".into());
            }
            Ok(sealed[12..sealed.len() - 16].iter().map(|b| b ^ 0x5A).collect())
        }

        fn algorithm(&self) -> &str {
            "TEST-XOR"
        }

        fn clone_box(&self) -> Box<dyn BlobEncryptor> {
            Box::new(XorEncryptor)
        }
    }

    #[test]
    fn plain_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let files = BlobFiles::new(dir.path().to_path_buf(), None);

        files.write(RecordingId(1), b"hello").unwrap();
        assert_eq!(fs::read(files.path_for(RecordingId(1))).unwrap(), b"hello");
        assert_eq!(files.read(RecordingId(1)).unwrap(), b"hello");
    }

    #[test]
    fn encrypted_file_is_sealed() {
        let dir = tempfile::tempdir().unwrap();
        let files = BlobFiles::new(dir.path().to_path_buf(), Some(Box::new(XorEncryptor)));

        files.write(RecordingId(3), &[1, 2, 3, 4]).unwrap();
        let on_disk = fs::read(files.path_for(RecordingId(3))).unwrap();
        assert_eq!(on_disk.len(), 12 + 4 + 16);
        assert_ne!(&on_disk[12..16], &[1, 2, 3, 4]);

        assert_eq!(files.read(RecordingId(3)).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let files = BlobFiles::new(dir.path().to_path_buf(), None);
        assert!(files.remove(RecordingId(42)).is_ok());
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
