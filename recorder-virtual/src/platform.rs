//! `MediaDevices` implementation over virtual hardware.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use recorder_core::models::constraints::{DisplayConstraints, StreamConstraints};
use recorder_core::models::device::{DeviceDescriptor, DeviceKind};
use recorder_core::models::error::RecorderError;
use recorder_core::models::media::{LiveStream, MediaSupport};
use recorder_core::traits::media_devices::MediaDevices;
use recorder_core::traits::media_track::{MediaTrack, TrackKind};
use recorder_core::traits::recorder_backend::RecorderBackend;

use crate::config::VirtualPlatformConfig;
use crate::device_enumerator::DeviceEnumerator;
use crate::permissions::{request_access, state_after_refusal, PermissionState, PromptResponse};
use crate::recorder::{RecorderFeed, SyntheticSource, VirtualRecorder};
use crate::track::{DeviceLocks, VirtualTrack};

#[derive(Debug, Default)]
struct StreamStats {
    acquisitions: usize,
    peak_active: usize,
}

/// Scriptable media platform.
///
/// Devices are exclusive: a device held by a live track cannot be opened
/// again until that track stops, the way most camera drivers behave.
pub struct VirtualPlatform {
    enumerator: DeviceEnumerator,
    permission: Mutex<PermissionState>,
    prompt_response: Mutex<PromptResponse>,
    supported_mime_types: Vec<String>,
    support: MediaSupport,
    synthetic_source: Option<SyntheticSource>,
    locks: DeviceLocks,
    streams: Mutex<HashMap<String, Vec<Arc<VirtualTrack>>>>,
    stats: Mutex<StreamStats>,
    recorders: Mutex<Vec<RecorderFeed>>,
    output_device: Mutex<Option<String>>,
    fail_enumeration: AtomicBool,
}

impl VirtualPlatform {
    pub fn new(config: VirtualPlatformConfig) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::InvalidConstraints)?;
        log::info!(
            "Virtual platform with {} device(s), permission {}",
            config.devices.len(),
            config.permission
        );
        Ok(Self {
            enumerator: DeviceEnumerator::new(config.devices),
            permission: Mutex::new(config.permission),
            prompt_response: Mutex::new(config.prompt_response),
            supported_mime_types: config.supported_mime_types,
            support: config.support,
            synthetic_source: config.synthetic_source,
            locks: DeviceLocks::default(),
            streams: Mutex::new(HashMap::new()),
            stats: Mutex::new(StreamStats::default()),
            recorders: Mutex::new(Vec::new()),
            output_device: Mutex::new(None),
            fail_enumeration: AtomicBool::new(false),
        })
    }

    pub fn permission(&self) -> PermissionState {
        *self.permission.lock()
    }

    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.lock() = permission;
    }

    pub fn set_prompt_response(&self, response: PromptResponse) {
        *self.prompt_response.lock() = response;
    }

    /// Make `enumerate_devices` fail until cleared.
    pub fn set_enumeration_failure(&self, fail: bool) {
        self.fail_enumeration.store(fail, Ordering::SeqCst);
    }

    pub fn attach_device(&self, device: DeviceDescriptor) {
        self.enumerator.attach(device);
    }

    /// Unplug a device. Live tracks on it end immediately.
    pub fn detach_device(&self, device_id: &str) -> bool {
        let removed = self.enumerator.detach(device_id);
        let affected: Vec<Arc<VirtualTrack>> = self
            .streams
            .lock()
            .values()
            .flatten()
            .filter(|t| t.device_id() == Some(device_id) && t.is_live())
            .cloned()
            .collect();
        for track in affected {
            track.stop();
        }
        removed
    }

    /// Feed of the most recently created recorder.
    pub fn last_recorder(&self) -> Option<RecorderFeed> {
        self.recorders.lock().last().cloned()
    }

    pub fn recorder_count(&self) -> usize {
        self.recorders.lock().len()
    }

    /// Output device playback is routed to, if one was set.
    pub fn output_device(&self) -> Option<String> {
        self.output_device.lock().clone()
    }

    /// Streams with at least one live track.
    pub fn active_stream_count(&self) -> usize {
        count_active(&self.streams.lock())
    }

    /// Most streams ever live at the same time.
    pub fn peak_active_streams(&self) -> usize {
        self.stats.lock().peak_active
    }

    /// Successful `get_user_media` and `get_display_media` calls.
    pub fn acquisition_count(&self) -> usize {
        self.stats.lock().acquisitions
    }

    /// Device ids currently held open, sorted.
    pub fn held_devices(&self) -> Vec<String> {
        let mut held: Vec<String> = self.locks.lock().iter().cloned().collect();
        held.sort();
        held
    }

    fn request_permission(&self) -> Result<(), RecorderError> {
        let response = *self.prompt_response.lock();
        let mut permission = self.permission.lock();
        match request_access(*permission, response) {
            Ok(state) => {
                *permission = state;
                Ok(())
            }
            Err(e) => {
                *permission = state_after_refusal(*permission, response);
                Err(e)
            }
        }
    }

    fn resolve(
        &self,
        kind: DeviceKind,
        device_id: Option<&str>,
    ) -> Result<DeviceDescriptor, RecorderError> {
        let noun = kind.fallback_noun().to_lowercase();
        match device_id {
            Some(id) => self
                .enumerator
                .find(kind, id)
                .ok_or_else(|| {
                    RecorderError::DeviceUnavailable(format!("no {} with id {}", noun, id))
                }),
            None => self
                .enumerator
                .default_device(kind)
                .ok_or_else(|| RecorderError::DeviceUnavailable(format!("no {} attached", noun))),
        }
    }

    fn open_tracks(
        &self,
        requests: Vec<(TrackKind, String, Option<String>)>,
    ) -> Result<Vec<Arc<VirtualTrack>>, RecorderError> {
        let mut tracks = Vec::with_capacity(requests.len());
        for (kind, label, device_id) in requests {
            match VirtualTrack::open(kind, label.clone(), device_id, &self.locks) {
                Some(track) => tracks.push(track),
                None => {
                    for track in &tracks {
                        track.stop();
                    }
                    return Err(RecorderError::DeviceUnavailable(format!("{} is in use", label)));
                }
            }
        }
        Ok(tracks)
    }

    fn register(&self, tracks: Vec<Arc<VirtualTrack>>) -> LiveStream {
        let id = uuid::Uuid::new_v4().to_string();
        let shared: Vec<Arc<dyn MediaTrack>> = tracks
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn MediaTrack>)
            .collect();

        let mut streams = self.streams.lock();
        streams.retain(|_, tracks| tracks.iter().any(|t| t.is_live()));
        streams.insert(id.clone(), tracks);

        let active = count_active(&streams);
        let mut stats = self.stats.lock();
        stats.acquisitions += 1;
        stats.peak_active = stats.peak_active.max(active);

        log::debug!("Opened stream {} ({} active)", id, active);
        LiveStream::new(id, shared)
    }
}

fn count_active(streams: &HashMap<String, Vec<Arc<VirtualTrack>>>) -> usize {
    streams
        .values()
        .filter(|tracks| tracks.iter().any(|t| t.is_live()))
        .count()
}

impl MediaDevices for VirtualPlatform {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, RecorderError> {
        if self.fail_enumeration.load(Ordering::SeqCst) {
            return Err(RecorderError::EnumerationFailed("device enumeration unavailable".into()));
        }
        Ok(self.enumerator.list(self.permission().is_granted()))
    }

    fn get_user_media(&self, constraints: &StreamConstraints) -> Result<LiveStream, RecorderError> {
        if !self.support.get_user_media {
            return Err(RecorderError::Unsupported("camera and microphone capture".into()));
        }
        constraints.validate()?;
        self.request_permission()?;

        let mut requests = Vec::new();
        if let Some(video) = &constraints.video {
            let device = self.resolve(DeviceKind::VideoInput, video.device_id.as_deref())?;
            requests.push((TrackKind::Video, device.label, Some(device.device_id)));
        }
        if let Some(audio) = &constraints.audio {
            let device = self.resolve(DeviceKind::AudioInput, audio.device_id.as_deref())?;
            requests.push((TrackKind::Audio, device.label, Some(device.device_id)));
        }

        let tracks = self.open_tracks(requests)?;
        Ok(self.register(tracks))
    }

    fn get_display_media(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<LiveStream, RecorderError> {
        if !self.support.screen_sharing {
            return Err(RecorderError::Unsupported("screen sharing".into()));
        }
        let mut requests = vec![(TrackKind::Video, "Screen 1".to_string(), None)];
        if constraints.audio {
            requests.push((TrackKind::Audio, "System Audio".to_string(), None));
        }
        let tracks = self.open_tracks(requests)?;
        Ok(self.register(tracks))
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.support.media_recorder && self.supported_mime_types.iter().any(|t| t == mime_type)
    }

    fn create_recorder(
        &self,
        stream: &LiveStream,
        mime_type: &str,
    ) -> Result<Box<dyn RecorderBackend>, RecorderError> {
        if !self.support.media_recorder {
            return Err(RecorderError::Unsupported("media recording".into()));
        }
        if !self.is_type_supported(mime_type) {
            return Err(RecorderError::Unsupported(format!("recorder type {}", mime_type)));
        }

        let tracks = self
            .streams
            .lock()
            .get(stream.id())
            .cloned()
            .ok_or_else(|| {
                RecorderError::InvalidState(format!("stream {} was not opened here", stream.id()))
            })?;
        if !tracks.iter().any(|t| t.is_live()) {
            return Err(RecorderError::InvalidState(format!("stream {} has ended", stream.id())));
        }

        let recorder = VirtualRecorder::new(mime_type, self.synthetic_source);
        let feed = recorder.feed();

        // The recording ends on its own once every track of the stream has.
        let watched: Arc<Vec<Weak<VirtualTrack>>> =
            Arc::new(tracks.iter().map(Arc::downgrade).collect());
        for track in &tracks {
            let watched = Arc::clone(&watched);
            let feed = feed.clone();
            track.on_ended(move || {
                let all_ended = watched
                    .iter()
                    .all(|t| t.upgrade().map_or(true, |t| !t.is_live()));
                if all_ended && feed.is_running() {
                    log::info!("Recorded stream ended; stopping recorder");
                    feed.finish();
                }
            });
        }

        self.recorders.lock().push(feed);
        Ok(Box::new(recorder))
    }

    fn set_audio_output(&self, device_id: &str) -> Result<(), RecorderError> {
        if !self.support.audio_output {
            return Err(RecorderError::Unsupported("audio output selection".into()));
        }
        let device = self.resolve(DeviceKind::AudioOutput, Some(device_id))?;
        *self.output_device.lock() = Some(device.device_id);
        Ok(())
    }

    fn support(&self) -> MediaSupport {
        self.support
    }
}
