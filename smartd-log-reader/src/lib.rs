//! smartd Attribute Log Reader Library
//!
//! Reads the per-device S.M.A.R.T. attribute logs written by smartd
//! (`/var/lib/smartmontools/attrlog.*.csv`) and turns them into a compact view of
//! how a chosen set of attributes changed over time.
//!
//! # Architecture
//!
//! - [`parser`] turns one `;`-delimited line into a timestamp and watched attributes
//! - [`attribute_log`] runs change detection over a whole log, keeping only the
//!   first record and records in which a watched attribute changed
//! - [`compaction`] shortens a retained log and recomputes deltas between survivors
//! - [`render`] projects a log into an aligned text table or a serializable report
//! - [`identity`] matches log file names with connected disks
//!
//! The library does NOT:
//! - Enumerate `/dev/disk/by-id` or the smartd log directory
//! - Parse command lines or print anything
//!
//! That is the job of the application layer (smartd-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use smartd_log_reader::{render_table, AttributeLog, DeviceName, LogConfig};
//! use std::path::Path;
//!
//! let config = LogConfig::new()
//!     .with_watch_attrs([5, 197, 198])
//!     .with_shorten(true);
//!
//! let log = AttributeLog::from_file(
//!     Path::new("/var/lib/smartmontools/attrlog.ST1000DM003-1CH162-Z1D2ABCD.ata.csv"),
//!     DeviceName::new("sda", "ST1000DM003_1CH162_Z1D2ABCD"),
//!     &config,
//! )
//! .unwrap();
//!
//! print!("{}", render_table(&log));
//! ```

// Public modules
pub mod attribute_log;
pub mod compaction;
pub mod config;
pub mod identity;
pub mod parser;
pub mod render;
pub mod types;

// Re-export main types for convenience
pub use attribute_log::{load_all, AttributeLog, ChangeTracker, LogJob};
pub use compaction::compact;
pub use config::{LogConfig, DEFAULT_MAX_RECORDS, DEFAULT_WATCH_ATTRS};
pub use identity::{DeviceList, DeviceLookup, LOG_FILE_LABEL};
pub use render::{render_table, DeviceReport};
pub use types::{
    AttributeId, AttributeMap, AttributeValue, DeviceName, LogError, LogRecord, RecordFault,
    Result, Timestamp, TIMESTAMP_FORMAT,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
