// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::schedule::RecurrencePolicy;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// tick_interval_secs = 5
/// record_dir = "recordings"
///
/// [[program]]
/// name = "Weasel's Wild Weekend 1"
/// station = "WTMD"
/// url = "http://wtmd-ice.streamguys1.com:80/wtmd"
/// file_root = "_WTMD_WWW1_"
///
/// [program.schedule]
/// day_of_week = "fri"
/// start_hm = 1850
/// duration_hm = 320
/// ```
///
/// Programs are kept in file order; that order is also the order in which
/// they are evaluated on every tick.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub capture: CaptureSection,

    /// All `[[program]]` entries.
    #[serde(default)]
    pub program: Vec<RawProgram>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// every descriptor carries a well-formed recurrence policy.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub capture: CaptureSection,
    pub programs: Vec<ProgramDescriptor>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        capture: CaptureSection,
        programs: Vec<ProgramDescriptor>,
    ) -> Self {
        Self {
            config,
            capture,
            programs,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Seconds between dispatcher ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Destination directory for programs without their own `dest_dir`.
    #[serde(default = "default_record_dir")]
    pub record_dir: PathBuf,

    /// Output file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_tick_interval_secs() -> u64 {
    5
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("recordings")
}

fn default_extension() -> String {
    "mp3".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            record_dir: default_record_dir(),
            extension: default_extension(),
        }
    }
}

/// `[capture]` section: how the ffmpeg engine transcodes a stream.
///
/// Defaults produce 128 kbps stereo 44.1 kHz MP3.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureSection {
    /// Executable to run (looked up on `PATH` if not absolute).
    pub program: String,
    pub codec: String,
    /// Container/muxer passed to `-f`.
    pub format: String,
    pub bitrate_kbps: u32,
    pub channels: u32,
    pub sample_rate: u32,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            codec: "libmp3lame".to_string(),
            format: "mp3".to_string(),
            bitrate_kbps: 128,
            channels: 2,
            sample_rate: 44100,
        }
    }
}

/// `[[program]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProgram {
    /// Display name, e.g. `"Young at Heart"`.
    pub name: String,
    pub station: String,
    /// Stream URL to capture.
    pub url: String,
    /// Inserted between the date and the sequence number of each file name.
    /// Must be unique among programs sharing a directory.
    pub file_root: String,
    /// Overrides `[config].record_dir`.
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,
    pub schedule: ScheduleConfig,
}

/// `[program.schedule]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// `everyday`, `mon`..`sun`, `weekdays` or `weekends`.
    pub day_of_week: String,
    /// Local start time as `HHMM`.
    pub start_hm: u32,
    /// Recording length as `HHMM`.
    pub duration_hm: u32,
}

/// Immutable description of one recurring recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramDescriptor {
    pub name: String,
    pub station: String,
    pub url: String,
    pub policy: RecurrencePolicy,
    pub dest_dir: PathBuf,
    pub file_root: String,
}
