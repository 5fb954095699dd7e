use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use recorder_core::storage::export::export_path;
use recorder_core::{
    export_recording, DeviceCatalog, DeviceKind, DisplayConstraints, RecorderConfiguration,
    RecorderError, RecordingId, RecordingStore, StoreConfiguration, Studio,
};
use recorder_virtual::{PermissionState, SyntheticSource, VirtualPlatform, VirtualPlatformConfig};

use crate::cli::Args;
use crate::console_delegate::ConsoleDelegate;
use crate::demo_encryptor::demo_encryptor;

const CHUNK_INTERVAL: Duration = Duration::from_millis(100);

fn open_store(args: &Args) -> Result<Arc<RecordingStore>, RecorderError> {
    let mut config = StoreConfiguration::in_directory(args.store_directory());
    if args.encrypt {
        config = config.with_encryptor(Box::new(demo_encryptor()));
    }
    log::debug!("Opening store at {}", config.database_path().display());
    Ok(Arc::new(RecordingStore::open(config)?))
}

pub fn list_devices(granted: bool) -> Result<(), RecorderError> {
    let mut config = VirtualPlatformConfig::default();
    if granted {
        config = config.with_permission(PermissionState::Granted);
    }
    let catalog = DeviceCatalog::new(Arc::new(VirtualPlatform::new(config)?));
    let devices = catalog.list_devices()?;

    for kind in [DeviceKind::VideoInput, DeviceKind::AudioInput, DeviceKind::AudioOutput] {
        println!("{}s:", kind.fallback_noun());
        for device in devices.of_kind(kind) {
            println!("  {:<8} {}", device.device_id, device.display_name());
        }
    }
    if !devices.labels_visible() {
        println!("(labels appear once capture permission is granted)");
    }
    Ok(())
}

/// Validated recording length for `--seconds`.
fn recording_length(seconds: f64) -> Result<Duration, RecorderError> {
    if seconds <= 0.0 {
        return Err(RecorderError::InvalidConstraints(format!(
            "recording length must be positive, got {}",
            seconds
        )));
    }
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        RecorderError::InvalidConstraints(format!("invalid recording length {}: {}", seconds, e))
    })
}

pub fn record(
    args: &Args,
    seconds: f64,
    screen: bool,
    chunk_size: usize,
) -> Result<(), RecorderError> {
    let length = recording_length(seconds)?;

    let source = SyntheticSource {
        chunk_size,
        interval: CHUNK_INTERVAL,
    };
    let platform = Arc::new(VirtualPlatform::new(
        VirtualPlatformConfig::default().with_synthetic_source(source),
    )?);
    let mut studio = Studio::new(platform, open_store(args)?, RecorderConfiguration::default())?;
    studio.set_delegate(Arc::new(ConsoleDelegate));

    studio.load_devices()?;
    if screen {
        studio.start_screen_share(DisplayConstraints { audio: true })?;
    } else {
        studio.start_stream()?;
    }

    studio.start_recording()?;
    thread::sleep(length);
    if studio.stop_recording()?.is_none() {
        println!("Nothing was recorded");
    }
    studio.stop_stream();
    Ok(())
}

pub fn list_recordings(args: &Args) -> Result<(), RecorderError> {
    let recordings = open_store(args)?.list_metadata()?;
    if recordings.is_empty() {
        println!("No recordings");
        return Ok(());
    }
    for recording in recordings {
        println!(
            "#{:<4} {:<40} {:>10}  {}",
            recording.id.0,
            recording.filename,
            recording.size_megabytes(),
            recording.display_date()
        );
    }
    Ok(())
}

pub fn export(args: &Args, id: u64, out: Option<PathBuf>) -> Result<(), RecorderError> {
    let store = open_store(args)?;
    let Some(recording) = store.get(RecordingId(id))? else {
        println!("No recording #{}", id);
        return Ok(());
    };

    let directory = out
        .or_else(dirs_next::download_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    export_recording(&recording, &directory);
    println!("Exported to {}", export_path(&recording, &directory).display());
    Ok(())
}

pub fn delete(args: &Args, id: u64) -> Result<(), RecorderError> {
    open_store(args)?.delete_by_id(RecordingId(id))?;
    println!("Deleted #{}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_length_accepts_fractions() {
        assert_eq!(recording_length(1.5).expect("length"), Duration::from_millis(1500));
    }

    #[test]
    fn recording_length_rejects_out_of_range() {
        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e30] {
            assert!(
                matches!(recording_length(seconds), Err(RecorderError::InvalidConstraints(_))),
                "accepted {}",
                seconds
            );
        }
    }
}
