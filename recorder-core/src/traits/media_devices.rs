use crate::models::constraints::{DisplayConstraints, StreamConstraints};
use crate::models::device::DeviceDescriptor;
use crate::models::error::RecorderError;
use crate::models::media::{LiveStream, MediaSupport};
use crate::traits::recorder_backend::RecorderBackend;

/// Platform media primitives: enumeration, capture, recording, playback
/// routing.
///
/// Implemented by:
/// - `VirtualPlatform` (recorder-virtual)
///
/// Calls that may show a permission prompt block until the user answers.
pub trait MediaDevices: Send + Sync {
    /// Snapshot of every input and output device, in platform order.
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, RecorderError>;

    /// Open a camera/microphone stream matching `constraints`.
    fn get_user_media(&self, constraints: &StreamConstraints) -> Result<LiveStream, RecorderError>;

    /// Open a screen capture stream.
    fn get_display_media(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<LiveStream, RecorderError>;

    /// Whether the platform recorder can produce `mime_type`.
    fn is_type_supported(&self, mime_type: &str) -> bool;

    /// Create a platform recorder over `stream` producing `mime_type`.
    ///
    /// Callers negotiate `mime_type` with `is_type_supported` first.
    fn create_recorder(
        &self,
        stream: &LiveStream,
        mime_type: &str,
    ) -> Result<Box<dyn RecorderBackend>, RecorderError>;

    /// Route preview playback to an output device.
    fn set_audio_output(&self, device_id: &str) -> Result<(), RecorderError>;

    fn support(&self) -> MediaSupport;
}
