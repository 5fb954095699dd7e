//! Virtual device table.
//!
//! Holds the attached devices with their real labels and hands out
//! listings the way a platform does: labels are blanked until capture
//! permission has been granted.

use parking_lot::RwLock;

use recorder_core::models::device::{DeviceDescriptor, DeviceKind};

pub struct DeviceEnumerator {
    devices: RwLock<Vec<DeviceDescriptor>>,
}

impl DeviceEnumerator {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// All devices in attach order. Labels are empty unless
    /// `labels_visible`.
    pub fn list(&self, labels_visible: bool) -> Vec<DeviceDescriptor> {
        self.devices
            .read()
            .iter()
            .map(|d| {
                if labels_visible {
                    d.clone()
                } else {
                    DeviceDescriptor::new(d.device_id.clone(), d.kind, "")
                }
            })
            .collect()
    }

    pub fn find(&self, kind: DeviceKind, device_id: &str) -> Option<DeviceDescriptor> {
        self.devices
            .read()
            .iter()
            .find(|d| d.kind == kind && d.matches(device_id))
            .cloned()
    }

    /// First attached device of `kind`, used when no id is requested.
    pub fn default_device(&self, kind: DeviceKind) -> Option<DeviceDescriptor> {
        self.devices.read().iter().find(|d| d.kind == kind).cloned()
    }

    /// Attach a device. Replaces any device with the same id and kind.
    pub fn attach(&self, device: DeviceDescriptor) {
        let mut devices = self.devices.write();
        devices.retain(|d| !(d.kind == device.kind && d.device_id == device.device_id));
        log::debug!("Attached {:?} {}", device.kind, device.device_id);
        devices.push(device);
    }

    /// Detach a device. Returns whether it was present.
    pub fn detach(&self, device_id: &str) -> bool {
        let mut devices = self.devices.write();
        let before = devices.len();
        devices.retain(|d| d.device_id != device_id);
        let removed = devices.len() != before;
        if removed {
            log::debug!("Detached device {}", device_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerator() -> DeviceEnumerator {
        DeviceEnumerator::new(vec![
            DeviceDescriptor::new("cam-1", DeviceKind::VideoInput, "Front Camera"),
            DeviceDescriptor::new("mic-1", DeviceKind::AudioInput, "Built-in Mic"),
            DeviceDescriptor::new("mic-2", DeviceKind::AudioInput, "USB Mic"),
        ])
    }

    #[test]
    fn labels_hidden_until_visible() {
        let e = enumerator();
        assert!(e.list(false).iter().all(|d| d.label.is_empty()));
        assert_eq!(e.list(true)[0].label, "Front Camera");
        assert_eq!(e.list(false)[2].device_id, "mic-2");
    }

    #[test]
    fn find_respects_kind() {
        let e = enumerator();
        assert!(e.find(DeviceKind::AudioInput, "mic-2").is_some());
        assert!(e.find(DeviceKind::VideoInput, "mic-2").is_none());
        assert_eq!(
            e.default_device(DeviceKind::AudioInput).map(|d| d.device_id),
            Some("mic-1".to_string())
        );
        assert!(e.default_device(DeviceKind::AudioOutput).is_none());
    }

    #[test]
    fn attach_and_detach() {
        let e = enumerator();
        e.attach(DeviceDescriptor::new("spk-1", DeviceKind::AudioOutput, "Speakers"));
        e.attach(DeviceDescriptor::new("spk-1", DeviceKind::AudioOutput, "Speakers (renamed)"));
        assert_eq!(e.len(), 4);
        assert!(e.detach("cam-1"));
        assert!(!e.detach("cam-1"));
        assert_eq!(e.len(), 3);
    }
}
