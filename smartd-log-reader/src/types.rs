//! Core types for the smartd attribute log reader
//!
//! This module defines the record model shared by the parser, the change-detection
//! builder, the compactor and the renderers: attribute values with their deltas,
//! log records, device identities and the library error type.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Timestamp type used throughout the reader (smartd logs carry local time, no zone)
pub type Timestamp = NaiveDateTime;

/// S.M.A.R.T. attribute identifier
pub type AttributeId = u32;

/// Attribute mapping of a single record, ordered by attribute ID for display
pub type AttributeMap = BTreeMap<AttributeId, AttributeValue>;

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Timestamp format used by smartd attribute logs (`YYYY-MM-DD HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One observed S.M.A.R.T. attribute with deltas against the previous retained value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AttributeValue {
    /// Normalized attribute value
    pub value: i64,
    /// Current minus previous normalized value
    pub value_delta: i64,
    /// Raw attribute value
    pub raw: i64,
    /// Current minus previous raw value
    pub raw_delta: i64,
}

impl AttributeValue {
    /// Create a fresh observation with zero deltas
    pub fn new(value: i64, raw: i64) -> Self {
        Self {
            value,
            value_delta: 0,
            raw,
            raw_delta: 0,
        }
    }

    /// Return a copy of this observation with deltas computed against `previous`
    ///
    /// A difference outside the `i64` range is clamped to `i64::MIN`/`i64::MAX`
    /// and reported with a warning.
    pub fn with_deltas_from(self, previous: &AttributeValue) -> Self {
        Self {
            value_delta: delta(self.value, previous.value),
            raw_delta: delta(self.raw, previous.raw),
            ..self
        }
    }

    /// True if either delta is non-zero
    pub fn has_changed(&self) -> bool {
        self.value_delta != 0 || self.raw_delta != 0
    }
}

fn delta(current: i64, previous: i64) -> i64 {
    current.checked_sub(previous).unwrap_or_else(|| {
        log::warn!(
            "Delta {} - {} overflows, clamped to the i64 range",
            current,
            previous
        );
        current.saturating_sub(previous)
    })
}

/// A single retained record of an attribute log
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Time of the observation (second precision)
    pub timestamp: Timestamp,
    /// Watched attributes present in the record
    pub attributes: AttributeMap,
}

impl LogRecord {
    pub fn new(timestamp: Timestamp, attributes: AttributeMap) -> Self {
        Self {
            timestamp,
            attributes,
        }
    }

    /// Timestamp rendered in the smartd log format
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Human-meaningful reference to the device a log belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DeviceName {
    /// Device node name (e.g. `sda`) or log file name
    pub file_name: String,
    /// Normalized `MODEL_SERIAL` label, or a placeholder when unknown
    pub model_label: String,
}

impl DeviceName {
    pub fn new(file_name: impl Into<String>, model_label: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            model_label: model_label.into(),
        }
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file_name, self.model_label)
    }
}

/// Reason a log record was rejected
#[derive(Debug, thiserror::Error)]
pub enum RecordFault {
    #[error("invalid number of fields ({fields})")]
    FieldCount { fields: usize },

    #[error("invalid date/time field - {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("invalid attribute(s) in group #{group}")]
    Attribute { group: usize },
}

/// Errors that can occur while reading attribute logs
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("malformed record #{record} of file {path:?}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        /// 1-based record index
        record: usize,
        reason: RecordFault,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LogError {
    /// Source file named in the error message, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            LogError::MalformedRecord { path, .. } | LogError::Io { path, .. } => Some(path.as_path()),
            LogError::InvalidConfig(_) => None,
        }
    }

    /// 1-based index of the offending record, if the error concerns one
    pub fn record_index(&self) -> Option<usize> {
        match self {
            LogError::MalformedRecord { record, .. } => Some(*record),
            _ => None,
        }
    }
}
