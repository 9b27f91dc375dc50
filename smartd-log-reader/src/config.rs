//! Reader configuration types
//!
//! This module defines the settings the log builder and compactor need: which
//! attributes to watch and whether (and how far) to shorten the retained log.
//! Where the settings come from (command line, TOML file) is the application's concern.

use crate::types::{AttributeId, LogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attributes watched when the caller supplies none.
///
/// - 5   Reallocated Sectors Count
/// - 191 G-sense Error Rate
/// - 196 Reallocation Event Count
/// - 197 Current Pending Sector Count
/// - 198 Uncorrectable Sector Count
/// - 200 Multi-Zone Error Rate
/// - 220 Disk Shift
pub const DEFAULT_WATCH_ATTRS: [AttributeId; 7] = [5, 191, 196, 197, 198, 200, 220];

/// Default row limit of a shortened log
pub const DEFAULT_MAX_RECORDS: usize = 20;

/// Configuration for building attribute logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Attributes considered for change detection (empty = defaults)
    #[serde(default)]
    pub watch_attrs: BTreeSet<AttributeId>,

    /// Whether to compact the retained log to `max_records` rows
    #[serde(default)]
    pub shorten: bool,

    /// Row limit applied when `shorten` is set
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            watch_attrs: BTreeSet::new(),
            shorten: false,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl LogConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the watched attributes
    pub fn with_watch_attrs(mut self, attrs: impl IntoIterator<Item = AttributeId>) -> Self {
        self.watch_attrs = attrs.into_iter().collect();
        self
    }

    /// Builder method: enable or disable compaction
    pub fn with_shorten(mut self, enabled: bool) -> Self {
        self.shorten = enabled;
        self
    }

    /// Builder method: set the row limit of a shortened log
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// The watch-list actually applied: the configured set, or the defaults if it is empty
    pub fn effective_watch_attrs(&self) -> BTreeSet<AttributeId> {
        if self.watch_attrs.is_empty() {
            DEFAULT_WATCH_ATTRS.into_iter().collect()
        } else {
            self.watch_attrs.clone()
        }
    }

    /// Row limit to compact to, if compaction was requested
    pub fn compaction_limit(&self) -> Option<usize> {
        self.shorten.then_some(self.max_records)
    }

    /// Check that the configuration can be applied
    pub fn validate(&self) -> Result<()> {
        if self.max_records == 0 {
            return Err(LogError::InvalidConfig(
                "max_records must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
