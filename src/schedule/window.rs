// src/schedule/window.rs

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

/// Format used whenever a timestamp is shown to the user
/// (e.g. `Fri 2021-10-29 18:50`).
pub const DISPLAY_FORMAT: &str = "%a %Y-%m-%d %H:%M";

/// One concrete occurrence of a recurring program on the wall clock.
///
/// `stop - start` always equals the owning policy's duration; a zero-length
/// window has `start == stop` and is valid for that single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        debug_assert!(stop >= start, "window stop precedes start");
        Self { start, stop }
    }

    /// `start <= now <= stop`.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        now >= self.start && now <= self.stop
    }

    /// Whether the stop instant has been reached.
    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        now >= self.stop
    }

    pub fn duration(&self) -> TimeDelta {
        self.stop - self.start
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(DISPLAY_FORMAT),
            self.stop.format(DISPLAY_FORMAT)
        )
    }
}
