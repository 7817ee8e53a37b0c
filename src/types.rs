use std::fmt;
use std::str::FromStr;

use chrono::Weekday;

/// Day-of-week code accepted in `[program.schedule].day_of_week`.
///
/// - `everyday` / `daily`: every day of the week.
/// - `mon` .. `sun`: one specific day each week.
/// - `weekdays`: Monday to Friday.
/// - `weekends`: Saturday and Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOfWeekSpec {
    Everyday,
    Day(Weekday),
    Weekdays,
    Weekends,
}

impl FromStr for DayOfWeekSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "everyday" | "daily" => Ok(DayOfWeekSpec::Everyday),
            "mon" => Ok(DayOfWeekSpec::Day(Weekday::Mon)),
            "tue" => Ok(DayOfWeekSpec::Day(Weekday::Tue)),
            "wed" => Ok(DayOfWeekSpec::Day(Weekday::Wed)),
            "thu" => Ok(DayOfWeekSpec::Day(Weekday::Thu)),
            "fri" => Ok(DayOfWeekSpec::Day(Weekday::Fri)),
            "sat" => Ok(DayOfWeekSpec::Day(Weekday::Sat)),
            "sun" => Ok(DayOfWeekSpec::Day(Weekday::Sun)),
            "weekdays" => Ok(DayOfWeekSpec::Weekdays),
            "weekends" => Ok(DayOfWeekSpec::Weekends),
            other => Err(format!(
                "invalid day_of_week: {other} (expected \"everyday\", \"mon\"..\"sun\", \"weekdays\" or \"weekends\")"
            )),
        }
    }
}

impl fmt::Display for DayOfWeekSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOfWeekSpec::Everyday => f.write_str("everyday"),
            DayOfWeekSpec::Day(day) => write!(f, "{}", day.to_string().to_lowercase()),
            DayOfWeekSpec::Weekdays => f.write_str("weekdays"),
            DayOfWeekSpec::Weekends => f.write_str("weekends"),
        }
    }
}

/// Phase of a program controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recording,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Recording => f.write_str("recording"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_codes_case_insensitively() {
        assert_eq!("FRI".parse(), Ok(DayOfWeekSpec::Day(Weekday::Fri)));
        assert_eq!(" weekends ".parse(), Ok(DayOfWeekSpec::Weekends));
        assert_eq!("daily".parse(), Ok(DayOfWeekSpec::Everyday));
    }

    #[test]
    fn rejects_unknown_day_code() {
        let err = "fryday".parse::<DayOfWeekSpec>().unwrap_err();
        assert!(err.contains("fryday"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for code in ["everyday", "sun", "weekdays", "weekends"] {
            let spec: DayOfWeekSpec = code.parse().unwrap();
            assert_eq!(spec.to_string(), code);
        }
    }
}
