use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};

use crate::traits::encryptor::BlobEncryptor;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM blob encryptor.
///
/// Sealed format: `nonce (12B) || ciphertext || tag (16B)`, a fresh random
/// nonce per blob.
#[derive(Clone)]
pub struct AesGcmBlobEncryptor {
    key: [u8; 32],
    cipher: Aes256Gcm,
}

impl AesGcmBlobEncryptor {
    pub fn new(key: [u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        Self { key, cipher }
    }
}

impl BlobEncryptor for AesGcmBlobEncryptor {
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, data)
            .map_err(|e| format!("AES-GCM encryption failed: {}", e))?;

        // aes-gcm already appends the tag to ciphertext, so just prepend nonce.
        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, String> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(format!("sealed blob too short: {} bytes", sealed.len()));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| format!("AES-GCM decryption failed: {}", e))
    }

    fn algorithm(&self) -> &str {
        "AES-256-GCM"
    }

    fn clone_box(&self) -> Box<dyn BlobEncryptor> {
        Box::new(Self::new(self.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let encryptor = AesGcmBlobEncryptor::new([7; 32]);
        let sealed = encryptor.encrypt(b"media payload").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + b"media payload".len() + TAG_LEN);
        assert_eq!(encryptor.decrypt(&sealed).unwrap(), b"media payload");
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = AesGcmBlobEncryptor::new([1; 32]).encrypt(b"secret").unwrap();
        assert!(AesGcmBlobEncryptor::new([2; 32]).decrypt(&sealed).is_err());
    }

    #[test]
    fn truncated_input_fails() {
        let encryptor = AesGcmBlobEncryptor::new([1; 32]);
        assert!(encryptor.decrypt(&[0; 10]).is_err());
    }

    #[test]
    fn nonces_differ_per_call() {
        let encryptor = AesGcmBlobEncryptor::new([3; 32]);
        let a = encryptor.encrypt(b"same").unwrap();
        let b = encryptor.encrypt(b"same").unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
    }
}
