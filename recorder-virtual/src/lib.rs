//! # recorder-virtual
//!
//! Virtual media platform for recorder-core.
//!
//! Provides:
//! - `VirtualPlatform`: `MediaDevices` over scripted cameras, microphones and outputs
//! - `VirtualTrack`: exclusive capture tracks that release their device on stop
//! - `VirtualRecorder` / `RecorderFeed`: recorder backend whose chunks are pushed
//!   by the caller or generated by a `SyntheticSource` thread
//! - `permissions`: the permission prompt and label gating
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use recorder_core::{RecordingStore, RecorderConfiguration, StoreConfiguration, Studio};
//! use recorder_virtual::{VirtualPlatform, VirtualPlatformConfig};
//!
//! let platform = Arc::new(VirtualPlatform::new(VirtualPlatformConfig::default())?);
//! let store = Arc::new(RecordingStore::open(StoreConfiguration::in_directory("/tmp/studio"))?);
//! let mut studio = Studio::new(platform.clone(), store, RecorderConfiguration::default())?;
//! studio.load_devices()?;
//! studio.start_stream()?;
//! ```

pub mod config;
pub mod device_enumerator;
pub mod permissions;
pub mod platform;
pub mod recorder;
pub mod track;

pub use config::VirtualPlatformConfig;
pub use device_enumerator::DeviceEnumerator;
pub use permissions::{PermissionState, PromptResponse};
pub use platform::VirtualPlatform;
pub use recorder::{RecorderFeed, SyntheticSource, VirtualRecorder};
pub use track::{DeviceLocks, VirtualTrack};
