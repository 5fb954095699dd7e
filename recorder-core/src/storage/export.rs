use std::fs;
use std::path::{Path, PathBuf};

use crate::models::recording::Recording;

/// Final path component of `filename`, or `"recording"` if none remains.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        "recording".to_string()
    } else {
        name.to_string()
    }
}

/// Target path a download of `recording` into `directory` would use.
pub fn export_path(recording: &Recording, directory: &Path) -> PathBuf {
    directory.join(sanitize_filename(recording.filename()))
}

/// Save a recording's blob under its filename in `directory`.
///
/// Fire-and-forget: the caller gets no completion signal, failures are only
/// logged.
pub fn export_recording(recording: &Recording, directory: &Path) {
    let path = export_path(recording, directory);
    let result =
        fs::create_dir_all(directory).and_then(|_| fs::write(&path, recording.blob.data()));
    match result {
        Ok(()) => log::info!("Exported recording {} to {}", recording.id(), path.display()),
        Err(e) => log::error!(
            "Failed to export recording {} to {}: {}",
            recording.id(),
            path.display(),
            e
        ),
    }
}
