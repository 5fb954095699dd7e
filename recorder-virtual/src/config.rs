//! Virtual platform configuration.

use recorder_core::models::device::{DeviceDescriptor, DeviceKind};
use recorder_core::models::media::MediaSupport;

use crate::permissions::{PermissionState, PromptResponse};
use crate::recorder::SyntheticSource;

/// Configuration for a [`crate::VirtualPlatform`].
#[derive(Debug, Clone)]
pub struct VirtualPlatformConfig {
    /// Attached devices with their real labels.
    pub devices: Vec<DeviceDescriptor>,
    pub permission: PermissionState,
    /// Answer given when the permission prompt is shown.
    pub prompt_response: PromptResponse,
    /// Recorder output types the platform can produce.
    pub supported_mime_types: Vec<String>,
    pub support: MediaSupport,
    /// Generate chunks automatically while recording. When `None`, chunks
    /// are only delivered through `RecorderFeed`.
    pub synthetic_source: Option<SyntheticSource>,
}

impl Default for VirtualPlatformConfig {
    fn default() -> Self {
        Self {
            devices: vec![
                DeviceDescriptor::new("cam-1", DeviceKind::VideoInput, "Virtual Camera"),
                DeviceDescriptor::new("mic-1", DeviceKind::AudioInput, "Virtual Microphone"),
                DeviceDescriptor::new("spk-1", DeviceKind::AudioOutput, "Virtual Speakers"),
            ],
            permission: PermissionState::Prompt,
            prompt_response: PromptResponse::Allow,
            supported_mime_types: vec![
                "video/webm".into(),
                "video/webm;codecs=vp8,opus".into(),
                "video/webm;codecs=vp9,opus".into(),
            ],
            support: MediaSupport {
                get_user_media: true,
                screen_sharing: true,
                audio_output: true,
                media_recorder: true,
            },
            synthetic_source: None,
        }
    }
}

impl VirtualPlatformConfig {
    pub fn with_devices(mut self, devices: Vec<DeviceDescriptor>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_permission(mut self, permission: PermissionState) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_prompt_response(mut self, response: PromptResponse) -> Self {
        self.prompt_response = response;
        self
    }

    pub fn with_supported_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_mime_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_support(mut self, support: MediaSupport) -> Self {
        self.support = support;
        self
    }

    pub fn with_synthetic_source(mut self, source: SyntheticSource) -> Self {
        self.synthetic_source = Some(source);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        for (i, device) in self.devices.iter().enumerate() {
            if device.device_id.is_empty() {
                return Err(format!("device {} has an empty id", i));
            }
            if self.devices[..i]
                .iter()
                .any(|d| d.kind == device.kind && d.device_id == device.device_id)
            {
                return Err(format!("duplicate {:?} device id {}", device.kind, device.device_id));
            }
        }
        if let Some(source) = self.synthetic_source {
            if source.chunk_size == 0 {
                return Err("synthetic chunk size must be > 0".into());
            }
            if source.interval.is_zero() {
                return Err("synthetic chunk interval must be > 0".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        assert!(VirtualPlatformConfig::default().validate().is_ok());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let config = VirtualPlatformConfig::default().with_devices(vec![
            DeviceDescriptor::new("cam-1", DeviceKind::VideoInput, "A"),
            DeviceDescriptor::new("cam-1", DeviceKind::VideoInput, "B"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn same_id_across_kinds_allowed() {
        let config = VirtualPlatformConfig::default().with_devices(vec![
            DeviceDescriptor::new("default", DeviceKind::AudioInput, "Mic"),
            DeviceDescriptor::new("default", DeviceKind::AudioOutput, "Speakers"),
        ]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_synthetic_chunks_rejected() {
        let config = VirtualPlatformConfig::default().with_synthetic_source(SyntheticSource {
            chunk_size: 0,
            interval: Duration::from_millis(10),
        });
        assert!(config.validate().is_err());
    }
}
