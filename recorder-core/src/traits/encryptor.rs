/// At-rest encryption for stored recording blobs.
///
/// Default implementation: `AesGcmBlobEncryptor` (AES-256-GCM).
///
/// Sealed format:
/// ```text
/// [12-byte nonce] [ciphertext] [16-byte GCM authentication tag]
/// ```
pub trait BlobEncryptor: Send + Sync {
    /// Seal a plaintext blob.
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, String>;

    /// Open a sealed blob produced by `encrypt`.
    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, String>;

    /// Algorithm identifier (e.g., "AES-256-GCM").
    fn algorithm(&self) -> &str;

    /// Clone this encryptor into a new boxed trait object.
    fn clone_box(&self) -> Box<dyn BlobEncryptor>;
}

// Allow StoreConfiguration to clone its encryptor via trait object.
impl Clone for Box<dyn BlobEncryptor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
