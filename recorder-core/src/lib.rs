//! # recorder-core
//!
//! Platform-agnostic core of the recording studio.
//!
//! Lists capture devices, owns the live capture stream, records it into a
//! single blob and keeps finished recordings in a local store. Platform
//! backends implement `MediaDevices` (enumeration, capture, recorder
//! creation) and plug into the generic components here.
//!
//! ## Architecture
//!
//! ```text
//! recorder-core (this crate)
//! ├── traits/    ← MediaDevices, MediaTrack, RecorderBackend, StudioDelegate,
//! │                BlobEncryptor
//! ├── models/    ← RecorderError, CaptureState, DeviceDescriptor,
//! │                StreamConstraints, Recording, configs
//! ├── devices/   ← DeviceCatalog
//! ├── session/   ← StreamSession, Studio (workflow orchestrator)
//! ├── capture/   ← Recorder, ChunkCollector, mime negotiation
//! └── storage/   ← RecordingStore, index, blob files, AES-GCM encryptor, export
//! ```

pub mod capture;
pub mod devices;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use capture::collector::ChunkCollector;
pub use capture::recorder::{create_recorder, negotiate_mime_type, PendingRecording, Recorder};
pub use devices::catalog::DeviceCatalog;
pub use models::config::{RecorderConfiguration, StoreConfiguration};
pub use models::constraints::{
    AudioConstraints, DisplayConstraints, StreamConstraints, VideoConstraints,
};
pub use models::device::{DeviceDescriptor, DeviceKind, DeviceListing, DeviceSelection};
pub use models::error::RecorderError;
pub use models::media::{LiveStream, MediaBlob, MediaChunk, MediaSupport, GENERIC_CONTAINER_MIME};
pub use models::recording::{Recording, RecordingId, RecordingMetadata};
pub use models::state::CaptureState;
pub use session::stream::{release_stream, SelectionOutcome, StreamSession};
pub use session::studio::Studio;
pub use storage::aes::AesGcmBlobEncryptor;
pub use storage::export::export_recording;
pub use storage::store::RecordingStore;
pub use traits::delegate::StudioDelegate;
pub use traits::encryptor::BlobEncryptor;
pub use traits::media_devices::MediaDevices;
pub use traits::media_track::{MediaTrack, TrackKind};
pub use traits::recorder_backend::{RecorderBackend, RecorderEvent, RecorderEventCallback};
