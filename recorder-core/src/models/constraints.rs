use serde::{Deserialize, Serialize};

use super::device::DeviceSelection;
use super::error::RecorderError;

/// Video half of a capture request. Dimensions and rate are ideal hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    /// Exact device match, or any camera when `None`.
    pub device_id: Option<String>,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl VideoConstraints {
    pub fn for_device(device_id: Option<String>) -> Self {
        Self {
            device_id,
            ..Default::default()
        }
    }
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            device_id: None,
            width: 1280,
            height: 720,
            frame_rate: 30,
        }
    }
}

/// Audio half of a capture request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConstraints {
    pub device_id: Option<String>,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl AudioConstraints {
    pub fn for_device(device_id: Option<String>) -> Self {
        Self {
            device_id,
            ..Default::default()
        }
    }
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            device_id: None,
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// Constraints for one camera/microphone capture attempt.
///
/// Built fresh per attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamConstraints {
    pub video: Option<VideoConstraints>,
    pub audio: Option<AudioConstraints>,
}

impl StreamConstraints {
    /// Audio and video requested, each pinned to the selected input if any.
    pub fn for_selection(selection: &DeviceSelection) -> Self {
        Self {
            video: Some(VideoConstraints::for_device(selection.video_input.clone())),
            audio: Some(AudioConstraints::for_device(selection.audio_input.clone())),
        }
    }

    pub fn audio_and_video() -> Self {
        Self {
            video: Some(VideoConstraints::default()),
            audio: Some(AudioConstraints::default()),
        }
    }

    pub fn validate(&self) -> Result<(), RecorderError> {
        if self.video.is_none() && self.audio.is_none() {
            return Err(RecorderError::InvalidConstraints(
                "at least one of audio or video must be requested".into(),
            ));
        }
        if let Some(video) = &self.video {
            if video.width == 0 || video.height == 0 {
                return Err(RecorderError::InvalidConstraints(format!(
                    "invalid resolution: {}x{}",
                    video.width, video.height
                )));
            }
            if video.frame_rate == 0 {
                return Err(RecorderError::InvalidConstraints(
                    "frame rate must be positive".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Constraints for a screen capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayConstraints {
    /// Also capture system/tab audio when the platform offers it.
    pub audio: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_capture_hints() {
        let video = VideoConstraints::default();
        assert_eq!((video.width, video.height, video.frame_rate), (1280, 720, 30));

        let audio = AudioConstraints::default();
        assert!(audio.echo_cancellation && audio.noise_suppression && audio.auto_gain_control);
    }

    #[test]
    fn for_selection_pins_inputs() {
        let selection = DeviceSelection {
            audio_input: Some("mic-1".into()),
            video_input: Some("cam-1".into()),
            audio_output: Some("spk-1".into()),
        };
        let constraints = StreamConstraints::for_selection(&selection);
        assert_eq!(
            constraints.video.as_ref().and_then(|v| v.device_id.as_deref()),
            Some("cam-1")
        );
        assert_eq!(
            constraints.audio.as_ref().and_then(|a| a.device_id.as_deref()),
            Some("mic-1")
        );
        assert!(constraints.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_request() {
        let err = StreamConstraints::default().validate().unwrap_err();
        assert!(matches!(err, RecorderError::InvalidConstraints(_)));
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let constraints = StreamConstraints {
            video: Some(VideoConstraints {
                width: 0,
                ..Default::default()
            }),
            audio: None,
        };
        assert!(constraints.validate().is_err());
    }
}
