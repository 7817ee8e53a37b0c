// src/schedule/resolver.rs

//! Next-window resolution.
//!
//! `resolve` is total: every `(now, policy)` pair yields exactly one window,
//! and that window has not fully elapsed at `now`. A caller that lands inside
//! today's window (e.g. after a restart mid-program) gets today's window back,
//! because "still valid today" is tested against the stop time rather than
//! the start time.

use chrono::{Datelike, NaiveDateTime, TimeDelta, Weekday};

use crate::schedule::policy::{RecurrenceClass, RecurrencePolicy};
use crate::schedule::window::Window;

/// Resolve the next occurrence of `policy` that `now` is inside of or before.
pub fn resolve(now: NaiveDateTime, policy: &RecurrencePolicy) -> Window {
    let today_start = now.date().and_time(policy.start_time());
    let today_stop = today_start + policy.duration();

    let offset = TimeDelta::days(days_ahead(now, policy));
    Window::new(today_start + offset, today_stop + offset)
}

/// Number of whole days between today and the day the resolved window
/// starts on.
pub fn days_ahead(now: NaiveDateTime, policy: &RecurrencePolicy) -> i64 {
    let today_stop = now.date().and_time(policy.start_time()) + policy.duration();
    let still_today = now <= today_stop;
    let today = now.weekday();

    match policy.class() {
        RecurrenceClass::Daily => {
            if still_today {
                0
            } else {
                1
            }
        }
        RecurrenceClass::Weekday(day) => {
            if today == day {
                if still_today { 0 } else { 7 }
            } else {
                days_until(today, day)
            }
        }
        RecurrenceClass::Weekdays => match today {
            Weekday::Sat => 2,
            Weekday::Sun => 1,
            Weekday::Fri => {
                if still_today {
                    0
                } else {
                    3
                }
            }
            _ => {
                if still_today {
                    0
                } else {
                    1
                }
            }
        },
        RecurrenceClass::Weekends => match today {
            Weekday::Sat => {
                if still_today {
                    0
                } else {
                    1
                }
            }
            // Past Sunday's window the next weekend day is Saturday.
            Weekday::Sun => {
                if still_today {
                    0
                } else {
                    6
                }
            }
            _ => days_until(today, Weekday::Sat),
        },
    }
}

/// `(target - today) mod 7`, counting Monday as day zero.
fn days_until(today: Weekday, target: Weekday) -> i64 {
    let today = i64::from(today.num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());
    (target - today).rem_euclid(7)
}
