use thiserror::Error;

/// Errors surfaced by the recording core.
///
/// Every variant is returned to the immediate caller; nothing is retried
/// internally. An unsupported recorder mime type is never surfaced (the
/// recorder silently downgrades) and deleting a missing record is a success.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("device enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available: {0}")]
    DeviceUnavailable(String),

    #[error("invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("recorder failed: {0}")]
    RecorderFailed(String),

    #[error("failed to open store: {0}")]
    StoreOpenFailed(String),

    #[error("store transaction failed: {0}")]
    StoreTransactionFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl RecorderError {
    /// Whether retrying with different constraints or devices may succeed.
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::DeviceUnavailable(_))
    }

    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreOpenFailed(_) | Self::StoreTransactionFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = RecorderError::DeviceUnavailable("cam-1".into());
        assert_eq!(err.to_string(), "device not available: cam-1");
        assert_eq!(RecorderError::PermissionDenied.to_string(), "permission denied");
    }

    #[test]
    fn classification() {
        assert!(RecorderError::PermissionDenied.is_device_error());
        assert!(!RecorderError::PermissionDenied.is_store_error());
        assert!(RecorderError::StoreTransactionFailed("x".into()).is_store_error());
        assert!(!RecorderError::InvalidState("x".into()).is_device_error());
    }
}
