use std::sync::Arc;

use crate::models::constraints::{DisplayConstraints, StreamConstraints};
use crate::models::device::DeviceSelection;
use crate::models::error::RecorderError;
use crate::models::media::LiveStream;
use crate::traits::media_devices::MediaDevices;

/// Result of applying a new device selection to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Nothing relevant changed, or no stream is active.
    Unchanged,
    /// Only the output device changed; playback was re-routed.
    OutputRerouted,
    /// An input device changed; the stream was released and re-acquired.
    Reacquired,
}

/// Stop every track of `stream`, if any. Idempotent.
pub fn release_stream(stream: Option<&LiveStream>) {
    if let Some(stream) = stream {
        stream.stop();
    }
}

/// Sole owner of the live capture stream.
///
/// Guarantees at most one active stream per session: a new stream is only
/// requested after the previous one has been stopped.
pub struct StreamSession {
    platform: Arc<dyn MediaDevices>,
    current: Option<LiveStream>,
    selection: DeviceSelection,
}

impl StreamSession {
    pub fn new(platform: Arc<dyn MediaDevices>) -> Self {
        Self {
            platform,
            current: None,
            selection: DeviceSelection::default(),
        }
    }

    /// Release the held stream, then request a new one.
    ///
    /// May block on a permission prompt. On failure the session holds no
    /// stream.
    pub fn acquire(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<LiveStream, RecorderError> {
        constraints.validate()?;
        self.release();

        let stream = self.platform.get_user_media(constraints).map_err(|e| {
            log::error!("Failed to acquire capture stream: {}", e);
            e
        })?;

        log::info!(
            "Acquired stream {} ({} tracks, video: {}, audio: {})",
            stream.id(),
            stream.tracks().len(),
            stream.has_video(),
            stream.has_audio()
        );
        self.current = Some(stream.clone());
        Ok(stream)
    }

    /// Release the held stream, then request a screen capture.
    pub fn acquire_display(
        &mut self,
        constraints: &DisplayConstraints,
    ) -> Result<LiveStream, RecorderError> {
        self.release();

        let stream = self.platform.get_display_media(constraints).map_err(|e| {
            log::error!("Failed to acquire display stream: {}", e);
            e
        })?;

        log::info!("Acquired display stream {}", stream.id());
        self.current = Some(stream.clone());
        Ok(stream)
    }

    /// Stop every track of the held stream. Safe without a stream.
    pub fn release(&mut self) {
        if let Some(stream) = self.current.take() {
            log::info!("Releasing stream {}", stream.id());
            release_stream(Some(&stream));
        }
    }

    pub fn current(&self) -> Option<&LiveStream> {
        self.current.as_ref()
    }

    /// Whether a stream is held and still live.
    pub fn has_active_stream(&self) -> bool {
        self.current.as_ref().is_some_and(LiveStream::is_active)
    }

    pub fn selection(&self) -> &DeviceSelection {
        &self.selection
    }

    /// Record a new selection and apply the re-acquisition policy.
    ///
    /// An input change with an active stream re-acquires with constraints
    /// built from the new selection; an output-only change just re-routes
    /// playback.
    pub fn apply_selection(
        &mut self,
        selection: DeviceSelection,
    ) -> Result<SelectionOutcome, RecorderError> {
        let previous = std::mem::replace(&mut self.selection, selection);

        if !self.has_active_stream() {
            return Ok(SelectionOutcome::Unchanged);
        }

        if previous.inputs_differ(&self.selection) && self.selection.has_inputs() {
            let constraints = StreamConstraints::for_selection(&self.selection);
            self.acquire(&constraints)?;
            self.route_selected_output();
            return Ok(SelectionOutcome::Reacquired);
        }

        if previous.audio_output != self.selection.audio_output {
            self.route_selected_output();
            return Ok(SelectionOutcome::OutputRerouted);
        }

        Ok(SelectionOutcome::Unchanged)
    }

    /// Route playback to `device_id`. Failures are logged, not returned.
    pub fn route_output(&self, device_id: &str) -> bool {
        if !self.platform.support().audio_output {
            log::debug!("Audio output selection not supported; keeping default output");
            return false;
        }
        match self.platform.set_audio_output(device_id) {
            Ok(()) => {
                log::info!("Routed playback to output {}", device_id);
                true
            }
            Err(e) => {
                log::warn!("Failed to set audio output device {}: {}", device_id, e);
                false
            }
        }
    }

    fn route_selected_output(&self) {
        if let Some(output) = self.selection.audio_output.clone() {
            self.route_output(&output);
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.release();
    }
}
