use serde::{Deserialize, Serialize};

/// Kind of media device reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    AudioInput,
    VideoInput,
    AudioOutput,
}

impl DeviceKind {
    /// Noun used when a device has no label yet.
    pub fn fallback_noun(&self) -> &'static str {
        match self {
            Self::AudioInput => "Microphone",
            Self::VideoInput => "Camera",
            Self::AudioOutput => "Speaker",
        }
    }

    pub fn is_input(&self) -> bool {
        !matches!(self, Self::AudioOutput)
    }
}

/// Number of id characters shown for a device without a label.
const FALLBACK_ID_CHARS: usize = 5;

/// A media device available for capture or playback.
///
/// Immutable snapshot from the platform; re-fetch through the catalog rather
/// than caching across permission changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub device_id: String,
    pub kind: DeviceKind,
    /// Empty until the user has granted capture permission at least once.
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(device_id: impl Into<String>, kind: DeviceKind, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            kind,
            label: label.into(),
        }
    }

    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    /// Opaque-token comparison against a selected device id.
    pub fn matches(&self, device_id: &str) -> bool {
        self.device_id == device_id
    }

    /// Label, or an id-derived name such as `"Camera abcde..."`.
    pub fn display_name(&self) -> String {
        if self.has_label() {
            return self.label.clone();
        }
        let short: String = self.device_id.chars().take(FALLBACK_ID_CHARS).collect();
        format!("{} {}...", self.kind.fallback_noun(), short)
    }
}

/// Devices partitioned by kind, in platform order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceListing {
    pub audio_inputs: Vec<DeviceDescriptor>,
    pub video_inputs: Vec<DeviceDescriptor>,
    pub audio_outputs: Vec<DeviceDescriptor>,
}

impl DeviceListing {
    pub fn from_devices(devices: impl IntoIterator<Item = DeviceDescriptor>) -> Self {
        let mut listing = Self::default();
        for device in devices {
            match device.kind {
                DeviceKind::AudioInput => listing.audio_inputs.push(device),
                DeviceKind::VideoInput => listing.video_inputs.push(device),
                DeviceKind::AudioOutput => listing.audio_outputs.push(device),
            }
        }
        listing
    }

    pub fn of_kind(&self, kind: DeviceKind) -> &[DeviceDescriptor] {
        match kind {
            DeviceKind::AudioInput => &self.audio_inputs,
            DeviceKind::VideoInput => &self.video_inputs,
            DeviceKind::AudioOutput => &self.audio_outputs,
        }
    }

    pub fn find(&self, kind: DeviceKind, device_id: &str) -> Option<&DeviceDescriptor> {
        self.of_kind(kind).iter().find(|d| d.matches(device_id))
    }

    pub fn len(&self) -> usize {
        self.audio_inputs.len() + self.video_inputs.len() + self.audio_outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once the platform exposes at least one label.
    pub fn labels_visible(&self) -> bool {
        self.iter().any(DeviceDescriptor::has_label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.audio_inputs
            .iter()
            .chain(self.video_inputs.iter())
            .chain(self.audio_outputs.iter())
    }

    /// First device of each kind.
    pub fn default_selection(&self) -> DeviceSelection {
        DeviceSelection {
            audio_input: self.audio_inputs.first().map(|d| d.device_id.clone()),
            video_input: self.video_inputs.first().map(|d| d.device_id.clone()),
            audio_output: self.audio_outputs.first().map(|d| d.device_id.clone()),
        }
    }
}

/// The user's chosen devices, by opaque id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSelection {
    pub audio_input: Option<String>,
    pub video_input: Option<String>,
    pub audio_output: Option<String>,
}

impl DeviceSelection {
    pub fn get(&self, kind: DeviceKind) -> Option<&str> {
        match kind {
            DeviceKind::AudioInput => self.audio_input.as_deref(),
            DeviceKind::VideoInput => self.video_input.as_deref(),
            DeviceKind::AudioOutput => self.audio_output.as_deref(),
        }
    }

    pub fn set(&mut self, kind: DeviceKind, device_id: Option<String>) {
        match kind {
            DeviceKind::AudioInput => self.audio_input = device_id,
            DeviceKind::VideoInput => self.video_input = device_id,
            DeviceKind::AudioOutput => self.audio_output = device_id,
        }
    }

    /// Whether the capture inputs differ (output changes don't count).
    pub fn inputs_differ(&self, other: &DeviceSelection) -> bool {
        self.audio_input != other.audio_input || self.video_input != other.video_input
    }

    pub fn has_inputs(&self) -> bool {
        self.audio_input.is_some() || self.video_input.is_some()
    }
}
