// src/schedule/policy.rs

use std::fmt;

use chrono::{NaiveTime, TimeDelta, Weekday};

use crate::types::DayOfWeekSpec;

/// Longest window a policy may describe.
pub const MAX_DURATION_SECS: u32 = 24 * 3600;

/// Which days a recurring window occurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceClass {
    Daily,
    Weekday(Weekday),
    /// Monday to Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
}

impl RecurrenceClass {
    /// Whether a window of this class may start on `day`.
    pub fn occurs_on(&self, day: Weekday) -> bool {
        match self {
            RecurrenceClass::Daily => true,
            RecurrenceClass::Weekday(d) => *d == day,
            RecurrenceClass::Weekdays => !matches!(day, Weekday::Sat | Weekday::Sun),
            RecurrenceClass::Weekends => matches!(day, Weekday::Sat | Weekday::Sun),
        }
    }
}

impl From<DayOfWeekSpec> for RecurrenceClass {
    fn from(spec: DayOfWeekSpec) -> Self {
        match spec {
            DayOfWeekSpec::Everyday => RecurrenceClass::Daily,
            DayOfWeekSpec::Day(day) => RecurrenceClass::Weekday(day),
            DayOfWeekSpec::Weekdays => RecurrenceClass::Weekdays,
            DayOfWeekSpec::Weekends => RecurrenceClass::Weekends,
        }
    }
}

impl fmt::Display for RecurrenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceClass::Daily => f.write_str("daily"),
            RecurrenceClass::Weekday(day) => write!(f, "every {day}"),
            RecurrenceClass::Weekdays => f.write_str("weekdays"),
            RecurrenceClass::Weekends => f.write_str("weekends"),
        }
    }
}

/// Immutable recurrence rule: which days, what time of day, how long.
///
/// Start times have whole-minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePolicy {
    class: RecurrenceClass,
    start: NaiveTime,
    duration_secs: u32,
}

impl RecurrencePolicy {
    /// Build a policy from an hour/minute start and a length in seconds.
    pub fn new(
        class: RecurrenceClass,
        hour: u32,
        minute: u32,
        duration_secs: u32,
    ) -> Result<Self, String> {
        let start = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| format!("invalid start time {hour:02}:{minute:02}"))?;

        if duration_secs > MAX_DURATION_SECS {
            return Err(format!(
                "duration of {duration_secs}s exceeds the 24h maximum"
            ));
        }

        Ok(Self {
            class,
            start,
            duration_secs,
        })
    }

    /// Build a policy from `HHMM`-encoded start and duration values
    /// (e.g. `1850` and `320` for 18:50 lasting 3h20m).
    pub fn from_hm(class: RecurrenceClass, start_hm: u32, duration_hm: u32) -> Result<Self, String> {
        let (hour, minute) = split_hm(start_hm);
        if minute >= 60 {
            return Err(format!("start_hm {start_hm}: minutes must be < 60"));
        }

        let (dur_hours, dur_minutes) = split_hm(duration_hm);
        if dur_minutes >= 60 {
            return Err(format!("duration_hm {duration_hm}: minutes must be < 60"));
        }

        Self::new(class, hour, minute, dur_hours * 3600 + dur_minutes * 60)
    }

    pub fn class(&self) -> RecurrenceClass {
        self.class
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.duration_secs))
    }
}

impl fmt::Display for RecurrencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mins = self.duration_secs / 60;
        write!(
            f,
            "{} at {} for {}h{:02}m",
            self.class,
            self.start.format("%H:%M"),
            mins / 60,
            mins % 60
        )
    }
}

fn split_hm(hm: u32) -> (u32, u32) {
    (hm / 100, hm % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hm_decodes_start_and_duration() {
        let policy =
            RecurrencePolicy::from_hm(RecurrenceClass::Weekday(Weekday::Fri), 1850, 320).unwrap();
        assert_eq!(policy.start_time(), NaiveTime::from_hms_opt(18, 50, 0).unwrap());
        assert_eq!(policy.duration_secs(), 3 * 3600 + 20 * 60);
        assert_eq!(policy.to_string(), "every Fri at 18:50 for 3h20m");
    }

    #[test]
    fn rejects_out_of_range_times() {
        assert!(RecurrencePolicy::from_hm(RecurrenceClass::Daily, 2400, 100).is_err());
        assert!(RecurrencePolicy::from_hm(RecurrenceClass::Daily, 1875, 100).is_err());
        assert!(RecurrencePolicy::from_hm(RecurrenceClass::Daily, 1800, 190).is_err());
        assert!(RecurrencePolicy::from_hm(RecurrenceClass::Daily, 1800, 2401).is_err());
    }

    #[test]
    fn zero_duration_is_allowed() {
        let policy = RecurrencePolicy::from_hm(RecurrenceClass::Daily, 0, 0).unwrap();
        assert_eq!(policy.duration_secs(), 0);
    }

    #[test]
    fn weekday_membership() {
        assert!(RecurrenceClass::Weekdays.occurs_on(Weekday::Fri));
        assert!(!RecurrenceClass::Weekdays.occurs_on(Weekday::Sat));
        assert!(RecurrenceClass::Weekends.occurs_on(Weekday::Sun));
        assert!(!RecurrenceClass::Weekends.occurs_on(Weekday::Mon));
        assert!(RecurrenceClass::Daily.occurs_on(Weekday::Wed));
    }
}
