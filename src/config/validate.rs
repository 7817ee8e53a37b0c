// src/config/validate.rs

use std::collections::HashSet;
use std::path::PathBuf;

use crate::capture::validate_source;
use crate::config::model::{ConfigFile, ProgramDescriptor, RawConfigFile, RawProgram};
use crate::errors::{RecorderError, Result};
use crate::schedule::{RecurrenceClass, RecurrencePolicy};
use crate::types::DayOfWeekSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::RecorderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_programs(&raw)?;
        validate_global_config(&raw)?;

        let programs = raw
            .program
            .iter()
            .map(|p| build_descriptor(&raw, p))
            .collect::<Result<Vec<_>>>()?;

        ensure_unique_file_roots(&programs)?;

        Ok(ConfigFile::new_unchecked(raw.config, raw.capture, programs))
    }
}

fn config_error(msg: impl Into<String>) -> RecorderError {
    RecorderError::ConfigError(msg.into())
}

fn ensure_has_programs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.program.is_empty() {
        return Err(config_error(
            "config must contain at least one [[program]] entry",
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.tick_interval_secs == 0 {
        return Err(config_error(
            "[config].tick_interval_secs must be >= 1 (got 0)",
        ));
    }

    let ext = cfg.config.extension.trim();
    if ext.is_empty() || ext.starts_with('.') {
        return Err(config_error(format!(
            "[config].extension must be a bare extension like \"mp3\" (got {:?})",
            cfg.config.extension
        )));
    }

    let capture = &cfg.capture;
    if capture.program.trim().is_empty() {
        return Err(config_error("[capture].program must not be empty"));
    }
    for (field, value) in [
        ("bitrate_kbps", capture.bitrate_kbps),
        ("channels", capture.channels),
        ("sample_rate", capture.sample_rate),
    ] {
        if value == 0 {
            return Err(config_error(format!("[capture].{field} must be > 0")));
        }
    }

    Ok(())
}

fn build_descriptor(cfg: &RawConfigFile, program: &RawProgram) -> Result<ProgramDescriptor> {
    for (field, value) in [
        ("name", &program.name),
        ("station", &program.station),
        ("url", &program.url),
        ("file_root", &program.file_root),
    ] {
        if value.trim().is_empty() {
            return Err(config_error(format!(
                "program {:?} has an empty `{field}`",
                program.name
            )));
        }
    }

    validate_source(&program.url)
        .map_err(|e| config_error(format!("program '{}': {e}", program.name)))?;

    let day: DayOfWeekSpec = program
        .schedule
        .day_of_week
        .parse()
        .map_err(|e| config_error(format!("program '{}': {e}", program.name)))?;

    let policy = RecurrencePolicy::from_hm(
        RecurrenceClass::from(day),
        program.schedule.start_hm,
        program.schedule.duration_hm,
    )
    .map_err(|e| config_error(format!("program '{}': {e}", program.name)))?;

    let dest_dir = program
        .dest_dir
        .clone()
        .unwrap_or_else(|| cfg.config.record_dir.clone());

    Ok(ProgramDescriptor {
        name: program.name.clone(),
        station: program.station.clone(),
        url: program.url.clone(),
        policy,
        dest_dir,
        file_root: program.file_root.clone(),
    })
}

/// Two programs writing the same directory with the same root would count
/// each other's files and could pick the same name.
fn ensure_unique_file_roots(programs: &[ProgramDescriptor]) -> Result<()> {
    let mut seen: HashSet<(PathBuf, &str)> = HashSet::new();
    for p in programs {
        if !seen.insert((p.dest_dir.clone(), p.file_root.as_str())) {
            return Err(config_error(format!(
                "program '{}' reuses file_root '{}' in {}",
                p.name,
                p.file_root,
                p.dest_dir.display()
            )));
        }
    }
    Ok(())
}
