//! Disk and log file enumeration
//!
//! Scans the persistent disk name directory for connected ATA/SCSI disks and the
//! smartd state directory for attribute logs.

use anyhow::{Context, Result};
use smartd_log_reader::identity::{model_from_disk_id, model_from_log_file_name};
use smartd_log_reader::{DeviceList, DeviceName};
use std::fs;
use std::path::Path;

/// Collect connected disks from `dir` (normally `/dev/disk/by-id`)
///
/// Each entry is resolved to its real device node name. A missing directory
/// yields an empty list.
pub fn scan_disks(dir: &Path) -> Result<DeviceList> {
    if !dir.is_dir() {
        log::warn!("Disk directory {:?} not found, no devices detected", dir);
        return Ok(DeviceList::default());
    }

    let mut devices = DeviceList::default();

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        let Some(model) = model_from_disk_id(&name) else {
            log::trace!("Skipping {}", name);
            continue;
        };

        let node = match fs::canonicalize(entry.path()) {
            Ok(target) => target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(name),
            Err(e) => {
                log::warn!("Cannot resolve {:?}: {}", entry.path(), e);
                continue;
            }
        };

        log::debug!("Found disk {} ({})", node, model);
        devices.push(DeviceName::new(node, model));
    }

    Ok(devices)
}

/// Collect smartd attribute logs in `dir`, sorted by file name
///
/// The model label of each entry is the normalized model parsed from the file name.
pub fn scan_log_files(dir: &Path) -> Result<Vec<DeviceName>> {
    let mut logs = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if let Some(model) = model_from_log_file_name(&name) {
            logs.push(DeviceName::new(name, model));
        }
    }

    logs.sort();
    Ok(logs)
}
