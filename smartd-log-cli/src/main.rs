//! smartd Log Viewer CLI Application
//!
//! This is the command-line interface for the smartd attribute log reader.
//! It uses the smartd-log-reader library and adds:
//! - Enumeration of connected disks and smartd log files
//! - Matching of log files to disks
//! - Text and JSON output
//! - Optional TOML configuration

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use smartd_log_reader::load_all;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod disks;

/// smartd Log Viewer - Show how S.M.A.R.T. attributes changed over time
#[derive(Parser, Debug)]
#[command(name = "smartd-log-cli")]
#[command(about = "Simple smartd attributes log viewer", long_about = None)]
#[command(version)]
struct Args {
    /// Device names (or log file paths with --files)
    #[arg(value_name = "DEVICE")]
    devices: Vec<String>,

    /// Show smartd log(s) for specified (or all) devices (default mode)
    #[arg(short, long, conflicts_with = "list")]
    show: bool,

    /// Display a list of connected disk devices or log files
    #[arg(short, long)]
    list: bool,

    /// Consider only the specified attributes (can be repeated; default 5, 191, 196, 197, 198, 200, 220)
    #[arg(
        short,
        long,
        value_name = "ATTR",
        num_args = 1..,
        action = ArgAction::Append,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    attrs: Vec<u32>,

    /// Shorten the shown log (no more than 20 rows unless configured otherwise)
    #[arg(short = 'r', long = "short")]
    short: bool,

    /// --show reads the named log files, --list lists log files instead of devices
    #[arg(short, long)]
    files: bool,

    /// With --list --files, show only logs that match no connected device
    #[arg(short, long)]
    orphans: bool,

    /// Text output (default)
    #[arg(short, long, conflicts_with = "json")]
    text: bool,

    /// JSON output
    #[arg(short, long)]
    json: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory with smartd attribute logs
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();
    if let Err(e) = check_mode_options(&args) {
        e.exit();
    }

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("smartd log viewer v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using reader library v{}", smartd_log_reader::VERSION);

    let mut app_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::AppConfig::default(),
    };
    if let Some(dir) = &args.log_dir {
        app_config.log_dir = dir.clone();
    }

    if !app_config.log_dir.exists() {
        eprintln!(
            "Directory \"{}\" is missing. Is smartmontools installed?",
            app_config.log_dir.display()
        );
        return Ok(ExitCode::from(2));
    }

    if args.list {
        list_mode(&args, &app_config)
    } else {
        show_mode(&args, &app_config)
    }
}

/// Reject options that make no sense outside show mode
fn check_mode_options(args: &Args) -> std::result::Result<(), clap::Error> {
    if !args.list {
        return Ok(());
    }

    let mut cmd = Args::command();
    if !args.devices.is_empty() || !args.attrs.is_empty() {
        return Err(cmd.error(ErrorKind::ArgumentConflict, "unnecessary parameters specified"));
    }
    if args.json {
        return Err(cmd.error(
            ErrorKind::ArgumentConflict,
            "JSON output supported by --show parameter only",
        ));
    }
    Ok(())
}

/// List mode - connected disks, or log files with --files
fn list_mode(args: &Args, app_config: &config::AppConfig) -> Result<ExitCode> {
    let disks = disks::scan_disks(&app_config.device_dir)?;

    if args.files {
        let log_files = disks::scan_log_files(&app_config.log_dir)?;
        print!(
            "{}",
            commands::list_log_files(&log_files, &disks, &app_config.log_dir, args.orphans)
        );
    } else {
        if args.orphans {
            log::debug!("--orphans is only used together with --files");
        }
        print!("{}", commands::list_devices(&disks));
    }

    Ok(ExitCode::SUCCESS)
}

/// Show mode - load all selected logs, then print them
fn show_mode(args: &Args, app_config: &config::AppConfig) -> Result<ExitCode> {
    let mut log_config = app_config.log.clone();
    if !args.attrs.is_empty() {
        log_config = log_config.with_watch_attrs(args.attrs.iter().copied());
    }
    if args.short {
        log_config = log_config.with_shorten(true);
    }

    let disks = disks::scan_disks(&app_config.device_dir)?;
    let log_files = disks::scan_log_files(&app_config.log_dir)?;

    let jobs = commands::collect_jobs(
        &args.devices,
        args.files,
        &disks,
        &log_files,
        &app_config.log_dir,
    );
    log::info!("{} log(s) selected", jobs.len());

    let logs = match load_all(jobs, &log_config) {
        Ok(logs) => logs,
        Err((path, e)) => {
            eprintln!("{}", commands::describe_load_failure(&path, &e));
            if args.verbose > 0 {
                eprintln!("{:?}", anyhow::Error::new(e));
            }
            return Ok(ExitCode::from(1));
        }
    };

    if args.json {
        println!("{}", commands::render_json(&logs).context("Failed to serialize logs")?);
    } else {
        print!("{}", commands::render_tables(&logs));
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
