//! Standalone attribute log inspector
//!
//! Reads one smartd attribute log, prints how many records survived change
//! detection and renders the retained log as a table.
//!
//! Usage:
//!   inspect_attrlog <attrlog.csv> [--attrs 5,197,198] [--short]
//!
//! Example:
//!   inspect_attrlog /var/lib/smartmontools/attrlog.ST1000DM003-1CH162-Z1D2ABCD.ata.csv --short

use smartd_log_reader::{render_table, AttributeLog, DeviceName, LogConfig, LOG_FILE_LABEL};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <attrlog.csv> [--attrs 5,197,198] [--short]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let mut config = LogConfig::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--attrs" => {
                if i + 1 < args.len() {
                    let attrs: Vec<u32> = args[i + 1]
                        .split(',')
                        .filter_map(|s| s.trim().parse().ok())
                        .collect();
                    config = config.with_watch_attrs(attrs);
                    i += 1;
                }
            }
            "--short" => config = config.with_shorten(true),
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let log = match AttributeLog::from_file(&path, DeviceName::new(file_name, LOG_FILE_LABEL), &config) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== ATTRIBUTE LOG SUMMARY ===");
    println!("Records read:      {}", log.raw_record_count);
    println!("Records shown:     {}", log.records.len());
    println!(
        "Watched attributes: {}",
        config
            .effective_watch_attrs()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    print!("{}", render_table(&log));
}
