use std::sync::Arc;

use crate::models::error::RecorderError;
use crate::models::media::MediaChunk;

/// Event delivered by a platform recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A chunk of encoded media became available.
    Data(MediaChunk),
    /// The recorder failed; no further data follows.
    Error(RecorderError),
    /// Terminal event: every pending chunk has been delivered.
    Stopped,
}

/// Callback invoked for each recorder event.
///
/// May fire on a platform thread. `Stopped` is delivered once, after the
/// last `Data` event, whether stop was requested or the stream ended.
pub type RecorderEventCallback = Arc<dyn Fn(RecorderEvent) + Send + Sync + 'static>;

/// Platform recorder wrapping a live stream.
///
/// Encoding is entirely the platform's; the core only sees chunks.
pub trait RecorderBackend: Send {
    /// Negotiated output type.
    fn mime_type(&self) -> &str;

    /// Begin recording, delivering events via `callback`.
    fn start(&mut self, callback: RecorderEventCallback) -> Result<(), RecorderError>;

    /// Request stop; remaining chunks are flushed before `Stopped`.
    fn stop(&mut self) -> Result<(), RecorderError>;
}
