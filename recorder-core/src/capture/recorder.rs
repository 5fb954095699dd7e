use std::sync::Arc;

use crate::capture::collector::ChunkCollector;
use crate::models::error::RecorderError;
use crate::models::media::{LiveStream, MediaBlob, GENERIC_CONTAINER_MIME};
use crate::models::state::CaptureState;
use crate::traits::media_devices::MediaDevices;
use crate::traits::recorder_backend::{RecorderBackend, RecorderEvent};

/// Pick the recorder output type.
///
/// Returns `preferred` when supported, otherwise `fallback`. The downgrade
/// is logged and never reported as an error.
pub fn negotiate_mime_type(
    preferred: &str,
    fallback: &str,
    is_supported: impl Fn(&str) -> bool,
) -> String {
    if is_supported(preferred) {
        return preferred.to_string();
    }
    log::warn!(
        "Recorder type {} not supported, falling back to {}",
        preferred,
        fallback
    );
    fallback.to_string()
}

/// Create a recorder over `stream`, downgrading to `video/webm` if the
/// platform cannot produce `preferred_mime_type`.
pub fn create_recorder(
    platform: &dyn MediaDevices,
    stream: &LiveStream,
    preferred_mime_type: &str,
) -> Result<Recorder, RecorderError> {
    Recorder::create(platform, stream, preferred_mime_type, GENERIC_CONTAINER_MIME)
}

/// Single-use capture session over a live stream.
///
/// `record` starts it, `stop` finalizes it; the blob is delivered through
/// the `PendingRecording` returned by `record`. Once stopped, a recorder
/// cannot be restarted.
pub struct Recorder {
    backend: Box<dyn RecorderBackend>,
    stream: LiveStream,
    mime_type: String,
    collector: Option<Arc<ChunkCollector>>,
}

impl Recorder {
    pub fn create(
        platform: &dyn MediaDevices,
        stream: &LiveStream,
        preferred_mime_type: &str,
        fallback_mime_type: &str,
    ) -> Result<Self, RecorderError> {
        let mime_type = negotiate_mime_type(preferred_mime_type, fallback_mime_type, |t| {
            platform.is_type_supported(t)
        });
        let backend = platform.create_recorder(stream, &mime_type)?;
        Ok(Self::with_backend(backend, stream.clone()))
    }

    /// Wrap an already created platform recorder.
    pub fn with_backend(backend: Box<dyn RecorderBackend>, stream: LiveStream) -> Self {
        let mime_type = backend.mime_type().to_string();
        Self {
            backend,
            stream,
            mime_type,
            collector: None,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn stream(&self) -> &LiveStream {
        &self.stream
    }

    pub fn state(&self) -> CaptureState {
        self.collector
            .as_ref()
            .map(|c| c.state())
            .unwrap_or(CaptureState::Idle)
    }

    /// Start capturing. Rejected unless the recorder is idle and the stream
    /// is live.
    pub fn record(&mut self) -> Result<PendingRecording, RecorderError> {
        if self.collector.is_some() {
            return Err(RecorderError::InvalidState(format!(
                "recorder already {}",
                self.state().as_str()
            )));
        }
        if !self.stream.is_active() {
            return Err(RecorderError::InvalidState(
                "cannot record an inactive stream".into(),
            ));
        }

        let collector = ChunkCollector::new(self.mime_type.clone());
        self.backend.start(collector.subscribe())?;
        log::info!("Recording stream {} as {}", self.stream.id(), self.mime_type);

        self.collector = Some(Arc::clone(&collector));
        Ok(PendingRecording { collector })
    }

    /// Request stop. Pending chunks are flushed before the recording
    /// resolves. A no-op once stopped.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        let Some(collector) = self.collector.as_ref() else {
            return Err(RecorderError::InvalidState("recorder was never started".into()));
        };

        if collector.state().is_terminal() {
            log::debug!("Recorder already stopped");
            return Ok(());
        }

        if let Err(e) = self.backend.stop() {
            // Resolve the pending recording so no waiter hangs.
            collector.handle(RecorderEvent::Error(e.clone()));
            return Err(e);
        }
        Ok(())
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.state().is_recording() {
            if let Err(e) = self.backend.stop() {
                log::warn!("Failed to stop recorder on drop: {}", e);
            }
        }
    }
}

/// Result of a recording in progress. Resolves exactly once, after stop.
pub struct PendingRecording {
    collector: Arc<ChunkCollector>,
}

impl PendingRecording {
    pub fn is_ready(&self) -> bool {
        self.collector.is_finished()
    }

    pub fn bytes_received(&self) -> usize {
        self.collector.bytes_received()
    }

    /// Block until the recorder has stopped and every chunk is assembled.
    pub fn wait(self) -> Result<MediaBlob, RecorderError> {
        self.collector.wait()
    }
}
