//! Show and list modes
//!
//! Everything here works on already-enumerated disks and log files and returns
//! the text to print, so the modes can be tested without touching `/dev`.

use anyhow::Result;
use smartd_log_reader::{
    render_table, AttributeLog, DeviceList, DeviceLookup, DeviceName, DeviceReport, LogError,
    LogJob, LOG_FILE_LABEL,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Decide which log files to read and which device each one belongs to
///
/// With `read_files`, `names` are log file paths (all logs in `log_dir` if empty)
/// labelled with the file name. Otherwise `names` are device node names (all
/// connected disks if empty) and only logs matching one of them are read.
pub fn collect_jobs(
    names: &[String],
    read_files: bool,
    disks: &DeviceList,
    log_files: &[DeviceName],
    log_dir: &Path,
) -> Vec<LogJob> {
    if read_files {
        let paths: Vec<PathBuf> = if names.is_empty() {
            log_files.iter().map(|f| log_dir.join(&f.file_name)).collect()
        } else {
            names.iter().map(PathBuf::from).collect()
        };

        return paths
            .into_iter()
            .map(|path| {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                LogJob::new(path, DeviceName::new(file_name, LOG_FILE_LABEL))
            })
            .collect();
    }

    let wanted: HashSet<&str> = if names.is_empty() {
        disks.iter().map(|d| d.file_name.as_str()).collect()
    } else {
        names.iter().map(String::as_str).collect()
    };

    log_files
        .iter()
        .filter_map(|log_file| {
            let Some(disk) = disks.find_by_model(&log_file.model_label) else {
                log::debug!("{} has no connected disk", log_file.file_name);
                return None;
            };
            wanted
                .contains(disk.file_name.as_str())
                .then(|| LogJob::new(log_dir.join(&log_file.file_name), disk.clone()))
        })
        .collect()
}

/// Message printed when a log of the batch cannot be loaded
///
/// Errors that already name their file are printed as-is.
pub fn describe_load_failure(path: &Path, err: &LogError) -> String {
    match err.path() {
        Some(_) => format!("error reading log file: {}", err),
        None => format!("error reading log file \"{}\": {}", path.display(), err),
    }
}

/// Text tables of all logs, in order
pub fn render_tables(logs: &[AttributeLog]) -> String {
    logs.iter().map(render_table).collect()
}

/// JSON array with one object per log, indented by two spaces
pub fn render_json(logs: &[AttributeLog]) -> Result<String> {
    let reports: Vec<DeviceReport> = logs.iter().map(DeviceReport::from_log).collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}

/// Listing of connected disks as `name: model`, sorted by name
pub fn list_devices(disks: &DeviceList) -> String {
    let mut out = String::from("Devices:\n");
    for disk in disks.sorted() {
        out.push_str(&format!("{}: {}\n", disk.file_name, disk.model_label));
    }
    out.push('\n');
    out
}

/// Listing of log files; with `orphans_only`, only logs without a connected disk
pub fn list_log_files(
    log_files: &[DeviceName],
    disks: &impl DeviceLookup,
    log_dir: &Path,
    orphans_only: bool,
) -> String {
    let mut out = format!("Log files (in {}):\n", log_dir.display());
    for log_file in log_files {
        if orphans_only && disks.find_by_model(&log_file.model_label).is_some() {
            continue;
        }
        out.push_str(&log_file.file_name);
        out.push('\n');
    }
    out.push('\n');
    out
}
