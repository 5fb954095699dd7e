use std::sync::Arc;

use chrono::Utc;

use crate::capture::recorder::{PendingRecording, Recorder};
use crate::devices::catalog::DeviceCatalog;
use crate::models::config::RecorderConfiguration;
use crate::models::constraints::{DisplayConstraints, StreamConstraints};
use crate::models::device::{DeviceKind, DeviceListing, DeviceSelection};
use crate::models::error::RecorderError;
use crate::models::media::{extension_for_mime, LiveStream};
use crate::models::recording::{recording_filename, RecordingId};
use crate::models::state::CaptureState;
use crate::session::stream::{SelectionOutcome, StreamSession};
use crate::storage::store::RecordingStore;
use crate::traits::delegate::StudioDelegate;
use crate::traits::media_devices::MediaDevices;

struct ActiveCapture {
    recorder: Recorder,
    pending: PendingRecording,
}

/// Recording workflow: device selection, preview stream, record, save.
///
/// Data flow:
/// ```text
/// [DeviceCatalog] → selection → [StreamSession] → [Recorder] → blob → [RecordingStore]
/// ```
/// Every step reports failures to the delegate and returns them; nothing
/// is retried.
pub struct Studio {
    platform: Arc<dyn MediaDevices>,
    catalog: DeviceCatalog,
    session: StreamSession,
    store: Arc<RecordingStore>,
    config: RecorderConfiguration,
    devices: DeviceListing,
    active: Option<ActiveCapture>,
    delegate: Option<Arc<dyn StudioDelegate>>,
}

impl Studio {
    pub fn new(
        platform: Arc<dyn MediaDevices>,
        store: Arc<RecordingStore>,
        config: RecorderConfiguration,
    ) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::InvalidConstraints)?;
        Ok(Self {
            catalog: DeviceCatalog::new(Arc::clone(&platform)),
            session: StreamSession::new(Arc::clone(&platform)),
            platform,
            store,
            config,
            devices: DeviceListing::default(),
            active: None,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn StudioDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn devices(&self) -> &DeviceListing {
        &self.devices
    }

    pub fn selection(&self) -> &DeviceSelection {
        self.session.selection()
    }

    pub fn stream(&self) -> Option<&LiveStream> {
        self.session.current()
    }

    pub fn has_stream(&self) -> bool {
        self.session.has_active_stream()
    }

    pub fn is_recording(&self) -> bool {
        self.capture_state().is_recording()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.active
            .as_ref()
            .map(|a| a.recorder.state())
            .unwrap_or(CaptureState::Idle)
    }

    pub fn store(&self) -> &Arc<RecordingStore> {
        &self.store
    }

    /// Enumerate devices and select the first of each kind.
    pub fn load_devices(&mut self) -> Result<&DeviceListing, RecorderError> {
        let devices = self.report(self.catalog.list_devices())?;
        let selection = devices.default_selection();
        self.devices = devices;
        let applied = self.session.apply_selection(selection);
        self.report(applied)?;

        if let Some(ref delegate) = self.delegate {
            delegate.on_devices_loaded(&self.devices);
        }
        Ok(&self.devices)
    }

    /// Change one device. Input changes re-acquire an active stream, output
    /// changes only re-route playback.
    pub fn select_device(
        &mut self,
        kind: DeviceKind,
        device_id: &str,
    ) -> Result<SelectionOutcome, RecorderError> {
        let mut selection = self.session.selection().clone();
        selection.set(kind, Some(device_id.to_string()));

        let applied = self.session.apply_selection(selection);
        let outcome = self.report(applied)?;
        if outcome == SelectionOutcome::Reacquired {
            self.notify_stream_changed();
        }
        Ok(outcome)
    }

    /// Acquire (or restart) the preview stream for the current selection.
    pub fn start_stream(&mut self) -> Result<LiveStream, RecorderError> {
        let constraints = StreamConstraints::for_selection(self.session.selection());
        let acquired = self.session.acquire(&constraints);
        let stream = self.report(acquired)?;

        if let Some(output) = self.session.selection().audio_output.clone() {
            self.session.route_output(&output);
        }
        self.notify_stream_changed();
        Ok(stream)
    }

    /// Replace the preview stream with a screen capture.
    pub fn start_screen_share(
        &mut self,
        constraints: DisplayConstraints,
    ) -> Result<LiveStream, RecorderError> {
        let acquired = self.session.acquire_display(&constraints);
        let stream = self.report(acquired)?;
        self.notify_stream_changed();
        Ok(stream)
    }

    /// Release the preview stream. Safe without one.
    pub fn stop_stream(&mut self) {
        if self.session.current().is_some() {
            self.session.release();
            self.notify_stream_changed();
        }
    }

    /// Start recording the preview stream.
    ///
    /// A previous recording that already ended with its stream is saved
    /// first.
    pub fn start_recording(&mut self) -> Result<(), RecorderError> {
        if self.is_recording() {
            return self.report(Err(RecorderError::InvalidState("already recording".into())));
        }
        let Some(stream) = self.session.current().filter(|s| s.is_active()).cloned() else {
            return self.report(Err(RecorderError::InvalidState(
                "no active stream to record".into(),
            )));
        };

        if let Some(previous) = self.active.take() {
            log::info!("Saving recording that ended before a new one was started");
            self.finalize(previous)?;
        }

        let mut recorder = self.report(Recorder::create(
            self.platform.as_ref(),
            &stream,
            &self.config.preferred_mime_type,
            &self.config.fallback_mime_type,
        ))?;
        let pending = self.report(recorder.record())?;

        self.active = Some(ActiveCapture { recorder, pending });
        self.notify_capture_state(CaptureState::Recording);
        Ok(())
    }

    /// Stop recording, wait for the blob and save it.
    ///
    /// Also saves a recording that already ended because its stream was
    /// replaced or stopped. Returns the new record id, or `None` when an
    /// empty recording was discarded.
    pub fn stop_recording(&mut self) -> Result<Option<RecordingId>, RecorderError> {
        let Some(active) = self.active.take() else {
            return self.report(Err(RecorderError::InvalidState("not recording".into())));
        };
        self.finalize(active)
    }

    /// Stop any recording (finalizing it) and release the stream.
    pub fn shutdown(&mut self) {
        if self.active.is_some() {
            if let Err(e) = self.stop_recording() {
                log::warn!("Failed to finalize recording during shutdown: {}", e);
            }
        }
        self.stop_stream();
    }

    fn finalize(&self, mut active: ActiveCapture) -> Result<Option<RecordingId>, RecorderError> {
        self.report(active.recorder.stop())?;
        let blob = self.report(active.pending.wait())?;
        self.notify_capture_state(CaptureState::Stopped);

        if blob.is_empty() && !self.config.save_empty_recordings {
            log::warn!("Recording produced no data; discarding");
            return Ok(None);
        }

        let filename = recording_filename(
            &self.config.filename_prefix,
            Utc::now(),
            extension_for_mime(blob.mime_type()),
        );
        let id = self.report(self.store.put(&blob, &filename))?;

        if let Some(ref delegate) = self.delegate {
            match self.store.get(id) {
                Ok(Some(recording)) => delegate.on_recording_saved(&recording.metadata),
                Ok(None) => {}
                Err(e) => log::warn!("Saved recording {} but could not read it back: {}", id, e),
            }
        }
        Ok(Some(id))
    }

    fn report<T>(&self, result: Result<T, RecorderError>) -> Result<T, RecorderError> {
        if let Err(ref e) = result {
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(e);
            }
        }
        result
    }

    fn notify_stream_changed(&self) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_stream_changed(self.session.current());
        }
    }

    fn notify_capture_state(&self, state: CaptureState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_capture_state_changed(state);
        }
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        self.shutdown();
    }
}
