use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::media_track::{MediaTrack, TrackKind};

/// Generic container used when a preferred recorder type is unsupported.
pub const GENERIC_CONTAINER_MIME: &str = "video/webm";

/// Opaque binary payload tagged with a mime type.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct MediaBlob {
    data: Vec<u8>,
    mime_type: String,
}

impl MediaBlob {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Concatenate chunks in arrival order.
    pub fn from_chunks(chunks: &[MediaChunk], mime_type: impl Into<String>) -> Self {
        let total = chunks.iter().map(MediaChunk::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in chunks {
            data.extend_from_slice(chunk.data());
        }
        Self::new(data, mime_type)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("len", &self.data.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// One fragment emitted by a recorder. Boundaries carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaChunk(MediaBlob);

impl MediaChunk {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self(MediaBlob::new(data, mime_type))
    }

    pub fn data(&self) -> &[u8] {
        self.0.data()
    }

    pub fn mime_type(&self) -> &str {
        self.0.mime_type()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Capability check for the platform's media APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaSupport {
    pub get_user_media: bool,
    pub screen_sharing: bool,
    pub audio_output: bool,
    pub media_recorder: bool,
}

impl MediaSupport {
    pub fn can_record(&self) -> bool {
        self.get_user_media && self.media_recorder
    }
}

/// Handle to the hardware tracks of one capture.
///
/// Clones share the same tracks: a recorder may hold a clone to read from
/// the stream, but only the owning `StreamSession` stops it.
#[derive(Clone)]
pub struct LiveStream {
    id: String,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl LiveStream {
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    /// Stream with a freshly generated id.
    pub fn with_tracks(tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), tracks)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Arc<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn tracks_of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.tracks.iter().filter(move |t| t.kind() == kind)
    }

    pub fn has_video(&self) -> bool {
        self.tracks_of_kind(TrackKind::Video).next().is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.tracks_of_kind(TrackKind::Audio).next().is_some()
    }

    /// True while any track is still live.
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track. Safe to call on an already-stopped stream.
    pub fn stop(&self) {
        for track in &self.tracks {
            if track.is_live() {
                track.stop();
            }
        }
    }
}

impl fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Container part of a mime type: `"video/webm;codecs=vp9"` → `"video/webm"`.
pub fn container_of(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or(mime_type).trim()
}

/// File extension for a recording of the given mime type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match container_of(mime_type) {
        "video/mp4" | "audio/mp4" => "mp4",
        "video/ogg" | "audio/ogg" => "ogg",
        "video/x-matroska" => "mkv",
        _ => "webm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_from_chunks_concatenates_in_order() {
        let chunks = vec![
            MediaChunk::new(vec![1, 2], "video/webm"),
            MediaChunk::new(vec![3], "video/webm"),
        ];
        let blob = MediaBlob::from_chunks(&chunks, "video/webm");
        assert_eq!(blob.data(), &[1, 2, 3]);
        assert_eq!(blob.len(), 3);
        assert_eq!(blob.mime_type(), "video/webm");
    }

    #[test]
    fn container_strips_codecs() {
        assert_eq!(container_of("video/webm;codecs=vp9,opus"), "video/webm");
        assert_eq!(container_of("video/mp4"), "video/mp4");
    }

    #[test]
    fn extension_defaults_to_webm() {
        assert_eq!(extension_for_mime("video/webm;codecs=vp8"), "webm");
        assert_eq!(extension_for_mime("video/mp4"), "mp4");
        assert_eq!(extension_for_mime("audio/ogg"), "ogg");
        assert_eq!(extension_for_mime(""), "webm");
    }

    #[test]
    fn debug_omits_payload() {
        let blob = MediaBlob::new(vec![0; 1024], "video/webm");
        let debug = format!("{:?}", blob);
        assert!(debug.contains("1024"));
        assert!(!debug.contains("[0, 0"));
    }
}
