// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `radiorec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "radiorec",
    version,
    about = "Record internet radio programs on a weekly schedule.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Seconds between schedule checks; overrides `[config].tick_interval_secs`.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RADIOREC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config, print every program's next window and exit
    /// without recording.
    #[arg(long)]
    pub dry_run: bool,

    /// Pretend it is this local time ("YYYY-MM-DD HH:MM") for `--dry-run`.
    #[arg(long, value_name = "DATETIME", value_parser = parse_local_datetime, requires = "dry_run")]
    pub at: Option<NaiveDateTime>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
