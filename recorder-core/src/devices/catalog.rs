use std::sync::Arc;

use crate::models::device::DeviceListing;
use crate::models::error::RecorderError;
use crate::models::media::MediaSupport;
use crate::traits::media_devices::MediaDevices;

/// Categorized view of the platform's media devices.
///
/// Holds no device state of its own: every call re-enumerates, since labels
/// (and on some platforms ids) change once permission is granted.
#[derive(Clone)]
pub struct DeviceCatalog {
    platform: Arc<dyn MediaDevices>,
}

impl DeviceCatalog {
    pub fn new(platform: Arc<dyn MediaDevices>) -> Self {
        Self { platform }
    }

    /// Enumerate once and partition by kind.
    ///
    /// Enumeration errors propagate unchanged; there is no retry.
    pub fn list_devices(&self) -> Result<DeviceListing, RecorderError> {
        let devices = self.platform.enumerate_devices().map_err(|e| {
            log::error!("Device enumeration failed: {}", e);
            e
        })?;

        let listing = DeviceListing::from_devices(devices);
        log::debug!(
            "Enumerated {} audio inputs, {} video inputs, {} audio outputs (labels visible: {})",
            listing.audio_inputs.len(),
            listing.video_inputs.len(),
            listing.audio_outputs.len(),
            listing.labels_visible()
        );
        Ok(listing)
    }

    pub fn media_support(&self) -> MediaSupport {
        self.platform.support()
    }
}
