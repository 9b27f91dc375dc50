//! Device identity helpers
//!
//! smartd names its attribute logs `attrlog.MODEL-SERIAL.ata.csv`, while the kernel
//! exposes disks as `/dev/disk/by-id/ata-MODEL_SERIAL`. The two use swapped
//! separators, so both sides are normalized before they are compared.

use crate::types::DeviceName;
use regex::Regex;
use std::sync::OnceLock;

/// Model label used when a log is read directly from a file
pub const LOG_FILE_LABEL: &str = "log file";

fn log_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^attrlog\.(.*?)\..*?\.csv").expect("valid log file pattern"))
}

fn disk_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(ata|scsi)-(.*)$").expect("valid disk id pattern"))
}

fn partition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-part\d+$").expect("valid partition pattern"))
}

/// Normalize a `MODEL_SERIAL` label so kernel and smartd names compare equal
pub fn normalize_model(name: &str) -> String {
    name.replace('-', "_")
}

/// Extract the normalized model label from a smartd log file name
pub fn model_from_log_file_name(file_name: &str) -> Option<String> {
    log_file_pattern()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_model(m.as_str()))
}

/// Extract the normalized model label from a `/dev/disk/by-id` entry
///
/// Only whole ATA and SCSI disks qualify; partitions and other buses are skipped.
pub fn model_from_disk_id(entry: &str) -> Option<String> {
    if partition_pattern().is_match(entry) {
        return None;
    }

    disk_id_pattern()
        .captures(entry)
        .and_then(|caps| caps.get(2))
        .map(|m| normalize_model(m.as_str()))
}

/// Lookup of connected devices by normalized model label
pub trait DeviceLookup {
    /// Return the device whose model label equals `model`, if any
    fn find_by_model(&self, model: &str) -> Option<&DeviceName>;
}

/// In-memory list of known devices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    devices: Vec<DeviceName>,
}

impl DeviceList {
    pub fn new(devices: Vec<DeviceName>) -> Self {
        Self { devices }
    }

    pub fn push(&mut self, device: DeviceName) {
        self.devices.push(device);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceName> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices ordered by device name, then model
    pub fn sorted(&self) -> Vec<&DeviceName> {
        let mut devices: Vec<&DeviceName> = self.devices.iter().collect();
        devices.sort();
        devices
    }
}

impl DeviceLookup for DeviceList {
    fn find_by_model(&self, model: &str) -> Option<&DeviceName> {
        self.devices.iter().find(|d| d.model_label == model)
    }
}

impl FromIterator<DeviceName> for DeviceList {
    fn from_iter<T: IntoIterator<Item = DeviceName>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
