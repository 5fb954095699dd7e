use serde::{Deserialize, Serialize};

/// Kind of a capture track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// One hardware capture track (camera, microphone, screen).
///
/// Stopping a track is the only way to release the device behind it.
/// Implementations use interior mutability: tracks are shared as
/// `Arc<dyn MediaTrack>` between a stream and any recorder reading it.
pub trait MediaTrack: Send + Sync {
    fn id(&self) -> &str;

    fn kind(&self) -> TrackKind;

    fn label(&self) -> &str;

    /// Device the track was opened on, if it maps to one.
    fn device_id(&self) -> Option<&str>;

    /// Whether the track is still delivering media.
    fn is_live(&self) -> bool;

    /// Stop the track and release its device. Idempotent.
    fn stop(&self);
}
