//! Change-detection log builder
//!
//! Drives the record parser over a whole attribute log and keeps only the records
//! that matter: the first one (the baseline) and every later record in which at
//! least one watched attribute differs from its last retained value.

use crate::compaction::compact;
use crate::config::LogConfig;
use crate::parser::{parse_record, split_fields, ParsedRecord};
use crate::types::{AttributeId, AttributeValue, DeviceName, LogError, LogRecord, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Tracks the last retained value of every watched attribute across a whole log
#[derive(Debug, Default)]
pub struct ChangeTracker {
    last_values: HashMap<AttributeId, AttributeValue>,
    first_record_seen: bool,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute deltas for a parsed record and decide whether to retain it
    ///
    /// Returns the record (with deltas filled in) if it is the first record seen
    /// or if at least one attribute changed, `None` otherwise.
    pub fn observe(&mut self, parsed: ParsedRecord) -> Option<LogRecord> {
        let mut changes = 0usize;
        let mut attributes = parsed.attributes;

        for (id, current) in attributes.iter_mut() {
            match self.last_values.get(id).copied() {
                Some(last) => {
                    *current = current.with_deltas_from(&last);
                    if current.has_changed() {
                        self.last_values.insert(*id, *current);
                        changes += 1;
                    }
                }
                None => {
                    self.last_values.insert(*id, *current);
                }
            }
        }

        let keep = !self.first_record_seen || changes > 0;
        self.first_record_seen = true;

        keep.then(|| LogRecord::new(parsed.timestamp, attributes))
    }
}

/// A parsed, change-filtered attribute log of one device
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeLog {
    /// Device the log belongs to
    pub device: DeviceName,
    /// Retained records in file order
    pub records: Vec<LogRecord>,
    /// Number of records read from the source, before filtering and compaction
    pub raw_record_count: usize,
}

impl AttributeLog {
    /// Read and build the log stored at `path`
    ///
    /// The file is closed on every exit path. Any malformed record aborts the
    /// build; no partial log is returned.
    pub fn from_file(path: &Path, device: DeviceName, config: &LogConfig) -> Result<Self> {
        log::info!("Reading attribute log: {:?}", path);

        let file = File::open(path).map_err(|source| LogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file), path, device, config)
    }

    /// Build a log from any buffered reader; `path` is only used in error reports
    pub fn from_reader<R: BufRead>(
        reader: R,
        path: &Path,
        device: DeviceName,
        config: &LogConfig,
    ) -> Result<Self> {
        config.validate()?;

        let watch: BTreeSet<AttributeId> = config.effective_watch_attrs();
        let mut tracker = ChangeTracker::new();
        let mut records = Vec::new();
        let mut raw_record_count = 0;

        for (ix, line) in reader.lines().enumerate() {
            let record = ix + 1;
            let line = line.map_err(|source| LogError::Io {
                path: path.to_path_buf(),
                source,
            })?;

            let parsed = parse_record(&split_fields(&line), record, path, &watch)?;
            raw_record_count += 1;

            match tracker.observe(parsed) {
                Some(retained) => records.push(retained),
                None => log::trace!("Record #{} of {:?} has no changes, dropped", record, path),
            }
        }

        let retained = records.len();
        if let Some(limit) = config.compaction_limit() {
            compact(&mut records, limit);
        }

        log::debug!(
            "{:?}: {} records read, {} retained, {} shown",
            path,
            raw_record_count,
            retained,
            records.len()
        );

        Ok(Self {
            device,
            records,
            raw_record_count,
        })
    }

    /// True if no record was retained
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every attribute ID appearing anywhere in the log, ascending
    pub fn attribute_ids(&self) -> BTreeSet<AttributeId> {
        self.records
            .iter()
            .flat_map(|rec| rec.attributes.keys().copied())
            .collect()
    }
}

/// A log file to load together with the device it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogJob {
    pub path: PathBuf,
    pub device: DeviceName,
}

impl LogJob {
    pub fn new(path: impl Into<PathBuf>, device: DeviceName) -> Self {
        Self {
            path: path.into(),
            device,
        }
    }
}

/// Load several logs strictly in order
///
/// The first failure aborts the batch and is returned together with the path of
/// the log that caused it; logs loaded before it are discarded.
pub fn load_all(
    jobs: impl IntoIterator<Item = LogJob>,
    config: &LogConfig,
) -> std::result::Result<Vec<AttributeLog>, (PathBuf, LogError)> {
    let mut logs = Vec::new();

    for job in jobs {
        match AttributeLog::from_file(&job.path, job.device, config) {
            Ok(log) => logs.push(log),
            Err(e) => return Err((job.path, e)),
        }
    }

    Ok(logs)
}
