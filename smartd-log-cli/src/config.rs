//! Configuration loading and parsing
//!
//! An optional TOML file can override where logs and disks are looked up and which
//! attributes are watched. Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smartd_log_reader::LogConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory where smartd stores attribute logs
pub const DEFAULT_LOG_DIR: &str = "/var/lib/smartmontools";

/// Directory with persistent disk names
pub const DEFAULT_DEVICE_DIR: &str = "/dev/disk/by-id";

/// Application configuration (loaded from a TOML file)
///
/// The reader settings (`watch_attrs`, `shorten`, `max_records`) sit at the top
/// level of the file next to the directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_device_dir")]
    pub device_dir: PathBuf,
    #[serde(flatten)]
    pub log: LogConfig,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_device_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE_DIR)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            device_dir: default_device_dir(),
            log: LogConfig::default(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .log
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}
