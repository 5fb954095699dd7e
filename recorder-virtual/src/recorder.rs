//! Virtual media recorder.
//!
//! Emits chunks pushed through a [`RecorderFeed`] handle, or generated on a
//! dedicated thread by a [`SyntheticSource`]. `Stopped` is delivered exactly
//! once: on stop, or when every track of the recorded stream has ended.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use recorder_core::models::error::RecorderError;
use recorder_core::models::media::{container_of, MediaChunk};
use recorder_core::traits::recorder_backend::{
    RecorderBackend, RecorderEvent, RecorderEventCallback,
};

/// Generates fixed-size chunks at a fixed interval while recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSource {
    pub chunk_size: usize,
    pub interval: Duration,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            interval: Duration::from_millis(100),
        }
    }
}

struct FeedState {
    mime_type: String,
    chunk_mime_type: String,
    running: AtomicBool,
    started: AtomicBool,
    callback: Mutex<Option<RecorderEventCallback>>,
    generator: Mutex<Option<thread::JoinHandle<()>>>,
}

/// Test-side handle onto a virtual recorder.
///
/// Chunks are typed with the container of the negotiated mime type, the way
/// real recorders drop the codec parameters on their chunks.
#[derive(Clone)]
pub struct RecorderFeed {
    state: Arc<FeedState>,
}

impl RecorderFeed {
    fn new(mime_type: &str) -> Self {
        Self {
            state: Arc::new(FeedState {
                mime_type: mime_type.to_string(),
                chunk_mime_type: container_of(mime_type).to_string(),
                running: AtomicBool::new(false),
                started: AtomicBool::new(false),
                callback: Mutex::new(None),
                generator: Mutex::new(None),
            }),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.state.mime_type
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Whether `start` was ever called.
    pub fn was_started(&self) -> bool {
        self.state.started.load(Ordering::SeqCst)
    }

    /// Deliver a chunk typed with the recorder's container. Returns `false`
    /// when the recorder is not running.
    pub fn push_chunk(&self, data: impl Into<Vec<u8>>) -> bool {
        let mime = self.state.chunk_mime_type.clone();
        self.push_typed_chunk(data, mime)
    }

    pub fn push_typed_chunk(&self, data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> bool {
        if !self.is_running() {
            log::debug!("Dropping chunk pushed to an idle recorder");
            return false;
        }
        self.emit(RecorderEvent::Data(MediaChunk::new(data.into(), mime_type)));
        true
    }

    /// Fail the recording. No further events follow.
    pub fn fail(&self, error: RecorderError) {
        if !self.state.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.join_generator();
        log::error!("Virtual recorder failed: {}", error);
        if let Some(callback) = self.state.callback.lock().take() {
            callback(RecorderEvent::Error(error));
        }
    }

    /// Flush and deliver `Stopped`. Idempotent.
    pub fn finish(&self) {
        if !self.state.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.join_generator();
        if let Some(callback) = self.state.callback.lock().take() {
            callback(RecorderEvent::Stopped);
        }
    }

    fn emit(&self, event: RecorderEvent) {
        let callback = self.state.callback.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn start(
        &self,
        callback: RecorderEventCallback,
        source: Option<SyntheticSource>,
    ) -> Result<(), RecorderError> {
        if self.state.started.swap(true, Ordering::SeqCst) {
            return Err(RecorderError::InvalidState("virtual recorder already started".into()));
        }
        *self.state.callback.lock() = Some(callback);
        self.state.running.store(true, Ordering::SeqCst);

        if let Some(source) = source {
            let feed = self.clone();
            let handle = thread::Builder::new()
                .name("virtual-recorder".into())
                .spawn(move || generate_chunks(feed, source))
                .map_err(|e| {
                    self.state.running.store(false, Ordering::SeqCst);
                    RecorderError::RecorderFailed(format!("failed to spawn recorder thread: {}", e))
                })?;
            *self.state.generator.lock() = Some(handle);
        }
        Ok(())
    }

    fn join_generator(&self) {
        let handle = self.state.generator.lock().take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::error!("Virtual recorder thread panicked");
            }
        }
    }
}

fn generate_chunks(feed: RecorderFeed, source: SyntheticSource) {
    let mut sequence: u8 = 0;
    while feed.is_running() {
        thread::sleep(source.interval);
        if !feed.is_running() {
            break;
        }
        feed.push_chunk(vec![sequence; source.chunk_size]);
        sequence = sequence.wrapping_add(1);
    }
}

/// `RecorderBackend` over a virtual stream.
pub struct VirtualRecorder {
    feed: RecorderFeed,
    source: Option<SyntheticSource>,
}

impl VirtualRecorder {
    pub fn new(mime_type: &str, source: Option<SyntheticSource>) -> Self {
        Self {
            feed: RecorderFeed::new(mime_type),
            source,
        }
    }

    pub fn feed(&self) -> RecorderFeed {
        self.feed.clone()
    }
}

impl RecorderBackend for VirtualRecorder {
    fn mime_type(&self) -> &str {
        self.feed.mime_type()
    }

    fn start(&mut self, callback: RecorderEventCallback) -> Result<(), RecorderError> {
        self.feed.start(callback, self.source)
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        if !self.feed.was_started() {
            return Err(RecorderError::InvalidState("virtual recorder was never started".into()));
        }
        self.feed.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_callback() -> (RecorderEventCallback, Arc<Mutex<Vec<RecorderEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: RecorderEventCallback = Arc::new(move |event| sink.lock().push(event));
        (callback, events)
    }

    #[test]
    fn chunks_use_the_container_type() {
        let mut recorder = VirtualRecorder::new("video/webm;codecs=vp9,opus", None);
        let feed = recorder.feed();
        let (callback, events) = recording_callback();

        assert!(!feed.push_chunk(vec![0u8; 4]));
        recorder.start(callback).expect("start");
        assert!(feed.push_chunk(vec![1u8; 10]));
        recorder.stop().expect("stop");

        let events = events.lock();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecorderEvent::Data(chunk) => {
                assert_eq!(chunk.mime_type(), "video/webm");
                assert_eq!(chunk.len(), 10);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(events[1], RecorderEvent::Stopped);
    }

    #[test]
    fn stopped_is_delivered_once() {
        let mut recorder = VirtualRecorder::new("video/webm", None);
        let feed = recorder.feed();
        let (callback, events) = recording_callback();

        recorder.start(callback).expect("start");
        feed.finish();
        recorder.stop().expect("stop after finish");
        assert!(!feed.push_chunk(vec![1]));
        assert_eq!(*events.lock(), vec![RecorderEvent::Stopped]);
    }

    #[test]
    fn stop_before_start_is_rejected() {
        let mut recorder = VirtualRecorder::new("video/webm", None);
        assert!(matches!(recorder.stop(), Err(RecorderError::InvalidState(_))));
    }

    #[test]
    fn cannot_start_twice() {
        let mut recorder = VirtualRecorder::new("video/webm", None);
        let (callback, _) = recording_callback();
        recorder.start(Arc::clone(&callback)).expect("start");
        assert!(recorder.start(callback).is_err());
    }

    #[test]
    fn failure_ends_the_recording() {
        let mut recorder = VirtualRecorder::new("video/webm", None);
        let feed = recorder.feed();
        let (callback, events) = recording_callback();

        recorder.start(callback).expect("start");
        feed.fail(RecorderError::RecorderFailed("encoder crashed".into()));
        feed.finish();
        assert_eq!(
            *events.lock(),
            vec![RecorderEvent::Error(RecorderError::RecorderFailed("encoder crashed".into()))]
        );
    }

    #[test]
    fn synthetic_source_delivers_chunks_before_stop() {
        let source = SyntheticSource {
            chunk_size: 8,
            interval: Duration::from_millis(5),
        };
        let mut recorder = VirtualRecorder::new("video/webm", Some(source));
        let (callback, events) = recording_callback();

        recorder.start(callback).expect("start");
        thread::sleep(Duration::from_millis(60));
        recorder.stop().expect("stop");

        let events = events.lock();
        assert!(events.len() >= 2);
        assert_eq!(events.last(), Some(&RecorderEvent::Stopped));
        assert!(events[..events.len() - 1]
            .iter()
            .all(|e| matches!(e, RecorderEvent::Data(c) if c.len() == 8)));
    }
}
