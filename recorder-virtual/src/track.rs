//! Virtual capture tracks.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use recorder_core::traits::media_track::{MediaTrack, TrackKind};

/// Device ids currently held open by a live track.
pub type DeviceLocks = Arc<Mutex<HashSet<String>>>;

type EndedListener = Box<dyn FnOnce() + Send>;

/// One simulated camera, microphone or screen track.
///
/// Holds its device's lock until stopped. Ended listeners run once, on the
/// thread that stops the track.
pub struct VirtualTrack {
    id: String,
    kind: TrackKind,
    label: String,
    device_id: Option<String>,
    live: AtomicBool,
    locks: DeviceLocks,
    ended_listeners: Mutex<Vec<EndedListener>>,
}

impl VirtualTrack {
    /// Open a track on `device_id`, taking its lock.
    ///
    /// Returns `None` if the device is already held by another live track.
    pub fn open(
        kind: TrackKind,
        label: impl Into<String>,
        device_id: Option<String>,
        locks: &DeviceLocks,
    ) -> Option<Arc<Self>> {
        if let Some(ref id) = device_id {
            if !locks.lock().insert(id.clone()) {
                return None;
            }
        }
        Some(Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label: label.into(),
            device_id,
            live: AtomicBool::new(true),
            locks: Arc::clone(locks),
            ended_listeners: Mutex::new(Vec::new()),
        }))
    }

    /// Run `listener` when the track ends. Runs immediately if it already
    /// has.
    pub fn on_ended(&self, listener: impl FnOnce() + Send + 'static) {
        {
            let mut listeners = self.ended_listeners.lock();
            if self.live.load(Ordering::SeqCst) {
                listeners.push(Box::new(listener));
                return;
            }
        }
        listener();
    }
}

impl MediaTrack for VirtualTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn stop(&self) {
        let listeners = {
            let mut listeners = self.ended_listeners.lock();
            if !self.live.swap(false, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *listeners)
        };

        if let Some(ref id) = self.device_id {
            self.locks.lock().remove(id);
        }
        log::debug!("Track {} ({}) ended", self.id, self.label);

        for listener in listeners {
            listener();
        }
    }
}

impl Drop for VirtualTrack {
    fn drop(&mut self) {
        if let Some(ref id) = self.device_id {
            if self.live.load(Ordering::SeqCst) {
                self.locks.lock().remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn device_is_exclusive_until_stopped() {
        let locks = DeviceLocks::default();
        let first = VirtualTrack::open(TrackKind::Video, "Cam", Some("cam-1".into()), &locks)
            .expect("first open");
        let second = VirtualTrack::open(TrackKind::Video, "Cam", Some("cam-1".into()), &locks);
        assert!(second.is_none());

        first.stop();
        assert!(!first.is_live());
        let reopened = VirtualTrack::open(TrackKind::Video, "Cam", Some("cam-1".into()), &locks);
        assert!(reopened.is_some());
    }

    #[test]
    fn tracks_without_device_never_conflict() {
        let locks = DeviceLocks::default();
        let a = VirtualTrack::open(TrackKind::Video, "Screen", None, &locks);
        let b = VirtualTrack::open(TrackKind::Video, "Screen", None, &locks);
        assert!(a.is_some() && b.is_some());
        assert!(locks.lock().is_empty());
    }

    #[test]
    fn ended_listeners_fire_once() {
        let locks = DeviceLocks::default();
        let track = VirtualTrack::open(TrackKind::Audio, "Mic", Some("mic-1".into()), &locks)
            .expect("open");
        let fired = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fired);
        track.on_ended(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        track.stop();
        track.stop();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let f = Arc::clone(&fired);
        track.on_ended(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_a_live_track_releases_its_device() {
        let locks = DeviceLocks::default();
        let track = VirtualTrack::open(TrackKind::Audio, "Mic", Some("mic-1".into()), &locks);
        drop(track);
        assert!(locks.lock().is_empty());
    }
}
