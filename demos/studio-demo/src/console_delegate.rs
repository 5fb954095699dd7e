use recorder_core::{
    CaptureState, DeviceListing, LiveStream, RecorderError, RecordingMetadata, StudioDelegate,
};

/// StudioDelegate that reports workflow events on the terminal.
pub struct ConsoleDelegate;

impl StudioDelegate for ConsoleDelegate {
    fn on_devices_loaded(&self, devices: &DeviceListing) {
        log::info!(
            "{} device(s) loaded (labels {})",
            devices.len(),
            if devices.labels_visible() { "visible" } else { "hidden" }
        );
    }

    fn on_stream_changed(&self, stream: Option<&LiveStream>) {
        match stream {
            Some(stream) => {
                let labels: Vec<&str> = stream.tracks().iter().map(|t| t.label()).collect();
                println!("Preview: {}", labels.join(" + "));
            }
            None => println!("Preview stopped"),
        }
    }

    fn on_capture_state_changed(&self, state: CaptureState) {
        println!("Recorder {}", state.as_str());
    }

    fn on_recording_saved(&self, recording: &RecordingMetadata) {
        println!(
            "Saved #{} {} ({})",
            recording.id,
            recording.filename,
            recording.size_megabytes()
        );
    }

    fn on_error(&self, error: &RecorderError) {
        eprintln!("Error: {}", error);
    }
}
