// src/engine/status.rs

//! Human-readable status report printed after every tick.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::engine::ProgramId;
use crate::schedule::{Window, DISPLAY_FORMAT};
use crate::types::Phase;

/// One program's line(s) in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramStatus {
    pub id: ProgramId,
    pub name: String,
    pub station: String,
    pub phase: Phase,
    pub window: Option<Window>,
    /// Present while recording.
    pub output: Option<PathBuf>,
    pub capture_running: bool,
}

/// Snapshot of every program, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub at: NaiveDateTime,
    pub programs: Vec<ProgramStatus>,
}

impl StatusReport {
    pub fn recording_count(&self) -> usize {
        self.programs
            .iter()
            .filter(|p| p.phase == Phase::Recording)
            .count()
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------------")?;
        write!(f, "{}", self.at.format(DISPLAY_FORMAT))?;
        for program in &self.programs {
            write!(f, "\n{program}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.phase {
            Phase::Recording => "Active",
            Phase::Idle => "Queued",
        };
        write!(f, "  {label}: {} - {}", self.station, self.name)?;

        match self.window {
            Some(window) => write!(f, " ({window})")?,
            None => write!(f, " (unscheduled)")?,
        }

        if let Some(output) = &self.output {
            let file = output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| output.display().to_string());
            write!(f, "\n          -> {file}")?;
            if !self.capture_running {
                write!(f, " (capture not running)")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 10, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn renders_active_and_queued_programs() {
        let report = StatusReport {
            at: at(29, 19, 30),
            programs: vec![
                ProgramStatus {
                    id: ProgramId(0),
                    name: "Weasel's Wild Weekend 1".into(),
                    station: "WTMD".into(),
                    phase: Phase::Recording,
                    window: Some(Window::new(at(29, 18, 50), at(29, 22, 10))),
                    output: Some(PathBuf::from("/rec/20211029_WTMD_WWW1_000.mp3")),
                    capture_running: true,
                },
                ProgramStatus {
                    id: ProgramId(1),
                    name: "Young at Heart".into(),
                    station: "WTMD".into(),
                    phase: Phase::Idle,
                    window: Some(Window::new(at(30, 7, 50), at(30, 9, 10))),
                    output: None,
                    capture_running: false,
                },
            ],
        };

        let expected = "\
-------------------
Fri 2021-10-29 19:30
  Active: WTMD - Weasel's Wild Weekend 1 (Fri 2021-10-29 18:50 - Fri 2021-10-29 22:10)
          -> 20211029_WTMD_WWW1_000.mp3
  Queued: WTMD - Young at Heart (Sat 2021-10-30 07:50 - Sat 2021-10-30 09:10)";

        assert_eq!(report.to_string(), expected);
        assert_eq!(report.recording_count(), 1);
    }

    #[test]
    fn flags_dead_capture() {
        let status = ProgramStatus {
            id: ProgramId(0),
            name: "Yacht Club".into(),
            station: "WTMD".into(),
            phase: Phase::Recording,
            window: Some(Window::new(at(31, 10, 50), at(31, 13, 10))),
            output: Some(PathBuf::from("20211031_WTMD_YC_000.mp3")),
            capture_running: false,
        };
        assert!(status.to_string().ends_with("-> 20211031_WTMD_YC_000.mp3 (capture not running)"));
    }
}
