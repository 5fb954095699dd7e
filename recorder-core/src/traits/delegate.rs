use crate::models::device::DeviceListing;
use crate::models::error::RecorderError;
use crate::models::media::LiveStream;
use crate::models::recording::RecordingMetadata;
use crate::models::state::CaptureState;

/// Event delegate for studio workflow notifications.
///
/// Called on the thread driving the `Studio`. The presentation layer
/// re-renders from these.
pub trait StudioDelegate: Send + Sync {
    /// Called after the device catalog was (re)loaded.
    fn on_devices_loaded(&self, devices: &DeviceListing);

    /// Called when the preview stream was acquired, replaced or released.
    fn on_stream_changed(&self, stream: Option<&LiveStream>);

    /// Called when the active recorder changes state.
    fn on_capture_state_changed(&self, state: CaptureState);

    /// Called after a finished recording has been stored.
    fn on_recording_saved(&self, recording: &RecordingMetadata);

    /// Called when a workflow step fails, before the error is returned.
    fn on_error(&self, error: &RecorderError);
}
