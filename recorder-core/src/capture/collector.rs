use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::models::error::RecorderError;
use crate::models::media::{MediaBlob, MediaChunk};
use crate::models::state::CaptureState;
use crate::traits::recorder_backend::{RecorderEvent, RecorderEventCallback};

struct CollectorState {
    state: CaptureState,
    chunks: Vec<MediaChunk>,
    bytes: usize,
    outcome: Option<Result<MediaBlob, RecorderError>>,
}

/// Subscription that accumulates recorder chunks and resolves once.
///
/// Lives from `record` until the terminal event. The outcome is set exactly
/// once, on `Stopped` or `Error`; events after that are ignored.
pub struct ChunkCollector {
    inner: Mutex<CollectorState>,
    finished: Condvar,
    /// Blob type when no chunk arrived to take the type from.
    default_mime_type: String,
}

impl ChunkCollector {
    pub fn new(default_mime_type: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(CollectorState {
                state: CaptureState::Recording,
                chunks: Vec::new(),
                bytes: 0,
                outcome: None,
            }),
            finished: Condvar::new(),
            default_mime_type: default_mime_type.into(),
        })
    }

    /// Callback handed to the platform recorder.
    pub fn subscribe(self: &Arc<Self>) -> RecorderEventCallback {
        let collector = Arc::clone(self);
        Arc::new(move |event| collector.handle(event))
    }

    pub fn handle(&self, event: RecorderEvent) {
        let mut s = self.inner.lock();
        if s.outcome.is_some() {
            log::debug!("Ignoring recorder event after completion");
            return;
        }

        match event {
            RecorderEvent::Data(chunk) => {
                if chunk.is_empty() {
                    return;
                }
                s.bytes += chunk.len();
                s.chunks.push(chunk);
            }
            RecorderEvent::Error(e) => {
                log::error!("Recorder error after {} chunks: {}", s.chunks.len(), e);
                s.chunks.clear();
                s.state = CaptureState::Stopped;
                s.outcome = Some(Err(e));
                self.finished.notify_all();
            }
            RecorderEvent::Stopped => {
                let chunks = std::mem::take(&mut s.chunks);
                let mime_type = chunks
                    .first()
                    .map(|c| c.mime_type().to_string())
                    .unwrap_or_else(|| self.default_mime_type.clone());
                let blob = MediaBlob::from_chunks(&chunks, mime_type);
                log::info!(
                    "Recording finished: {} chunks, {} bytes, {}",
                    chunks.len(),
                    blob.len(),
                    blob.mime_type()
                );
                s.state = CaptureState::Stopped;
                s.outcome = Some(Ok(blob));
                self.finished.notify_all();
            }
        }
    }

    pub fn state(&self) -> CaptureState {
        self.inner.lock().state
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().outcome.is_some()
    }

    /// Chunks collected so far (zero once finished).
    pub fn chunk_count(&self) -> usize {
        self.inner.lock().chunks.len()
    }

    /// Bytes received so far, including those already assembled.
    pub fn bytes_received(&self) -> usize {
        self.inner.lock().bytes
    }

    /// Block until the terminal event and take the outcome.
    ///
    /// Only the first caller receives the blob; later callers get
    /// `InvalidState`.
    pub fn wait(&self) -> Result<MediaBlob, RecorderError> {
        let mut s = self.inner.lock();
        while s.state != CaptureState::Stopped {
            self.finished.wait(&mut s);
        }
        s.outcome
            .take()
            .unwrap_or_else(|| Err(RecorderError::InvalidState("recording already taken".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn assembles_chunks_typed_by_first_chunk() {
        let collector = ChunkCollector::new("video/webm;codecs=vp9,opus");
        let callback = collector.subscribe();

        callback(RecorderEvent::Data(MediaChunk::new(vec![1; 10], "video/webm")));
        callback(RecorderEvent::Data(MediaChunk::new(vec![2; 20], "video/x-other")));
        assert_eq!(collector.chunk_count(), 2);
        assert!(!collector.is_finished());

        callback(RecorderEvent::Stopped);
        let blob = collector.wait().unwrap();
        assert_eq!(blob.len(), 30);
        assert_eq!(blob.mime_type(), "video/webm");
        assert_eq!(&blob.data()[..10], &[1; 10]);
    }

    #[test]
    fn empty_chunks_are_skipped() {
        let collector = ChunkCollector::new("video/webm");
        collector.handle(RecorderEvent::Data(MediaChunk::new(Vec::new(), "audio/ogg")));
        collector.handle(RecorderEvent::Data(MediaChunk::new(vec![9; 4], "video/webm")));
        collector.handle(RecorderEvent::Stopped);

        let blob = collector.wait().unwrap();
        assert_eq!(blob.len(), 4);
        assert_eq!(blob.mime_type(), "video/webm");
    }

    #[test]
    fn zero_chunks_yield_empty_blob_with_default_type() {
        let collector = ChunkCollector::new("video/webm");
        collector.handle(RecorderEvent::Stopped);

        let blob = collector.wait().unwrap();
        assert!(blob.is_empty());
        assert_eq!(blob.mime_type(), "video/webm");
    }

    #[test]
    fn resolves_only_once() {
        let collector = ChunkCollector::new("video/webm");
        collector.handle(RecorderEvent::Stopped);
        collector.handle(RecorderEvent::Data(MediaChunk::new(vec![1], "video/webm")));
        collector.handle(RecorderEvent::Stopped);

        assert!(collector.wait().unwrap().is_empty());
        assert!(matches!(collector.wait(), Err(RecorderError::InvalidState(_))));
    }

    #[test]
    fn error_event_finishes_with_error() {
        let collector = ChunkCollector::new("video/webm");
        collector.handle(RecorderEvent::Data(MediaChunk::new(vec![1], "video/webm")));
        collector.handle(RecorderEvent::Error(RecorderError::RecorderFailed("encoder".into())));

        assert_eq!(collector.state(), CaptureState::Stopped);
        assert_eq!(
            collector.wait(),
            Err(RecorderError::RecorderFailed("encoder".into()))
        );
    }

    #[test]
    fn wait_blocks_until_stop_from_another_thread() {
        let collector = ChunkCollector::new("video/webm");
        let callback = collector.subscribe();

        let producer = thread::spawn(move || {
            callback(RecorderEvent::Data(MediaChunk::new(vec![0; 8], "video/webm")));
            thread::sleep(Duration::from_millis(20));
            callback(RecorderEvent::Data(MediaChunk::new(vec![0; 8], "video/webm")));
            callback(RecorderEvent::Stopped);
        });

        let blob = collector.wait().unwrap();
        producer.join().unwrap();
        assert_eq!(blob.len(), 16);
        assert_eq!(collector.bytes_received(), 16);
    }
}
