//! Integration tests for the capture pipeline over the virtual platform

use std::sync::Arc;

use recorder_core::models::constraints::{AudioConstraints, VideoConstraints};
use recorder_core::models::device::{DeviceKind, DeviceSelection};
use recorder_core::{
    create_recorder, DeviceCatalog, MediaDevices, RecorderError, RecordingStore, SelectionOutcome,
    StoreConfiguration, StreamConstraints, StreamSession,
};
use recorder_virtual::{PermissionState, VirtualPlatform, VirtualPlatformConfig};

fn granted_platform() -> Arc<VirtualPlatform> {
    let config = VirtualPlatformConfig::default().with_permission(PermissionState::Granted);
    Arc::new(VirtualPlatform::new(config).expect("platform"))
}

fn selection(video: &str, audio: &str) -> DeviceSelection {
    DeviceSelection {
        video_input: Some(video.into()),
        audio_input: Some(audio.into()),
        audio_output: None,
    }
}

#[test]
fn test_record_and_store_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let platform = granted_platform();
    let store =
        RecordingStore::open(StoreConfiguration::in_directory(dir.path())).expect("open store");

    let constraints = StreamConstraints {
        video: Some(VideoConstraints::for_device(Some("cam-1".into()))),
        audio: Some(AudioConstraints::for_device(Some("mic-1".into()))),
    };
    let mut session = StreamSession::new(platform.clone());
    let stream = session.acquire(&constraints).expect("acquire");
    assert!(stream.has_video() && stream.has_audio());

    let mut recorder = create_recorder(platform.as_ref(), &stream, "video/webm;codecs=vp9,opus")
        .expect("recorder");
    assert_eq!(recorder.mime_type(), "video/webm;codecs=vp9,opus");
    let pending = recorder.record().expect("record");

    let feed = platform.last_recorder().expect("feed");
    assert!(feed.push_chunk(vec![1u8; 10]));
    assert!(feed.push_chunk(vec![2u8; 20]));
    recorder.stop().expect("stop");

    let blob = pending.wait().expect("blob");
    assert_eq!(blob.len(), 30);
    assert_eq!(blob.mime_type(), "video/webm");
    assert_eq!(&blob.data()[..10], &[1u8; 10]);

    store.put(&blob, "test.webm").expect("put");
    let recordings = store.list_all().expect("list");
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].filename(), "test.webm");
    assert_eq!(recordings[0].size(), 30);
    assert_eq!(recordings[0].mime_type(), "video/webm");
    assert_eq!(recordings[0].blob, blob);
}

#[test]
fn test_enumeration_before_permission_uses_fallback_names() {
    let platform =
        Arc::new(VirtualPlatform::new(VirtualPlatformConfig::default()).expect("platform"));
    let catalog = DeviceCatalog::new(platform.clone());

    let listing = catalog.list_devices().expect("list");
    assert_eq!(listing.len(), 3);
    assert!(!listing.labels_visible());
    assert_eq!(listing.video_inputs[0].display_name(), "Camera cam-1...");
    assert_eq!(listing.audio_inputs[0].display_name(), "Microphone mic-1...");
    assert_eq!(listing.audio_outputs[0].display_name(), "Speaker spk-1...");
}

#[test]
fn test_enumeration_failure_propagates() {
    let platform = granted_platform();
    platform.set_enumeration_failure(true);
    let catalog = DeviceCatalog::new(platform.clone());
    assert!(matches!(catalog.list_devices(), Err(RecorderError::EnumerationFailed(_))));
}

#[test]
fn test_acquire_releases_previous_stream_first() {
    let platform = granted_platform();
    let mut session = StreamSession::new(platform.clone());

    let first = session.acquire(&StreamConstraints::audio_and_video()).expect("first");
    let second = session.acquire(&StreamConstraints::audio_and_video()).expect("second");
    let third = session.acquire(&StreamConstraints::audio_and_video()).expect("third");

    assert!(!first.is_active());
    assert!(!second.is_active());
    assert!(third.is_active());
    assert_eq!(platform.peak_active_streams(), 1);
    assert_eq!(platform.active_stream_count(), 1);

    session.release();
    session.release();
    assert!(platform.held_devices().is_empty());
}

#[test]
fn test_output_change_does_not_reacquire() {
    let platform = granted_platform();
    platform.attach_device(recorder_core::DeviceDescriptor::new(
        "spk-2",
        DeviceKind::AudioOutput,
        "Headphones",
    ));
    let mut session = StreamSession::new(platform.clone());
    session.apply_selection(selection("cam-1", "mic-1")).expect("select");
    let constraints = StreamConstraints::for_selection(session.selection());
    let stream = session.acquire(&constraints).expect("acquire");
    let acquisitions = platform.acquisition_count();

    let mut changed = session.selection().clone();
    changed.audio_output = Some("spk-2".into());
    assert_eq!(
        session.apply_selection(changed).expect("apply"),
        SelectionOutcome::OutputRerouted
    );
    assert_eq!(platform.acquisition_count(), acquisitions);
    assert_eq!(platform.output_device().as_deref(), Some("spk-2"));
    assert!(stream.is_active());
}

#[test]
fn test_input_change_reacquires() {
    let platform = granted_platform();
    platform.attach_device(recorder_core::DeviceDescriptor::new(
        "cam-2",
        DeviceKind::VideoInput,
        "Document Camera",
    ));
    let mut session = StreamSession::new(platform.clone());
    session.apply_selection(selection("cam-1", "mic-1")).expect("select");
    let constraints = StreamConstraints::for_selection(session.selection());
    let before = session.acquire(&constraints).expect("acquire");

    assert_eq!(
        session.apply_selection(selection("cam-2", "mic-1")).expect("apply"),
        SelectionOutcome::Reacquired
    );
    let after = session.current().cloned().expect("stream");
    assert_ne!(before.id(), after.id());
    assert!(!before.is_active());
    assert_eq!(platform.held_devices(), vec!["cam-2", "mic-1"]);
    assert_eq!(platform.peak_active_streams(), 1);
}

#[test]
fn test_unsupported_type_falls_back_to_generic_container() {
    let config = VirtualPlatformConfig::default()
        .with_permission(PermissionState::Granted)
        .with_supported_mime_types(["video/webm"]);
    let platform = Arc::new(VirtualPlatform::new(config).expect("platform"));
    assert!(!platform.is_type_supported("video/webm;codecs=vp9,opus"));

    let stream = platform
        .get_user_media(&StreamConstraints::audio_and_video())
        .expect("stream");
    let recorder = create_recorder(platform.as_ref(), &stream, "video/webm;codecs=vp9,opus")
        .expect("recorder");
    assert_eq!(recorder.mime_type(), "video/webm");
}

#[test]
fn test_stream_end_finalizes_recording() {
    let platform = granted_platform();
    let mut session = StreamSession::new(platform.clone());
    let stream = session.acquire(&StreamConstraints::audio_and_video()).expect("acquire");

    let mut recorder = create_recorder(platform.as_ref(), &stream, "video/webm").expect("recorder");
    let pending = recorder.record().expect("record");
    platform.last_recorder().expect("feed").push_chunk(vec![7u8; 5]);

    session.release();
    assert!(pending.is_ready());
    let blob = pending.wait().expect("blob");
    assert_eq!(blob.len(), 5);
    recorder.stop().expect("stop after stream end is a no-op");
}

#[test]
fn test_recording_without_chunks_yields_empty_blob() {
    let platform = granted_platform();
    let stream = platform
        .get_user_media(&StreamConstraints::audio_and_video())
        .expect("stream");
    let mut recorder = create_recorder(platform.as_ref(), &stream, "video/webm;codecs=vp8,opus")
        .expect("recorder");
    let pending = recorder.record().expect("record");
    recorder.stop().expect("stop");

    let blob = pending.wait().expect("blob");
    assert!(blob.is_empty());
    assert_eq!(blob.mime_type(), "video/webm;codecs=vp8,opus");
    stream.stop();
}
