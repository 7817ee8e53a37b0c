// tests/schedule_properties.rs

mod common;
use crate::common::builders::controller_for;
use crate::common::fake_capture::FakeCaptureEngine;
use crate::common::at;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Weekday};
use proptest::prelude::*;

use radiorec::config::ProgramDescriptor;
use radiorec::engine::ProgramEvent;
use radiorec::fs::mock::MockFileSystem;
use radiorec::schedule::{resolve, RecurrenceClass, RecurrencePolicy, Window};

fn class_strategy() -> impl Strategy<Value = RecurrenceClass> {
    prop_oneof![
        Just(RecurrenceClass::Daily),
        Just(RecurrenceClass::Weekdays),
        Just(RecurrenceClass::Weekends),
        prop::sample::select(vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ])
        .prop_map(RecurrenceClass::Weekday),
    ]
}

/// Any valid policy, durations in whole minutes up to a full day.
fn policy_strategy() -> impl Strategy<Value = RecurrencePolicy> {
    (class_strategy(), 0u32..24, 0u32..60, 0u32..=24 * 60).prop_map(|(class, h, m, dur_min)| {
        RecurrencePolicy::new(class, h, m, dur_min * 60).expect("valid policy")
    })
}

/// Any instant in a three-week span (second resolution).
fn instant_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..21 * 86_400).prop_map(|secs| at(2021, 10, 18, 0, 0) + TimeDelta::seconds(secs))
}

/// Occurrences of `policy` starting on any day in `from - 1 ..= to + 1`.
fn occurrences(policy: &RecurrencePolicy, from: NaiveDateTime, to: NaiveDateTime) -> Vec<Window> {
    let mut day = from.date() - TimeDelta::days(1);
    let last = to.date() + TimeDelta::days(1);
    let mut out = Vec::new();
    while day <= last {
        if policy.class().occurs_on(day.weekday()) {
            let start = day.and_time(policy.start_time());
            out.push(Window::new(start, start + policy.duration()));
        }
        day += TimeDelta::days(1);
    }
    out
}

proptest! {
    #[test]
    fn resolved_window_matches_the_policy(policy in policy_strategy(), now in instant_strategy()) {
        let window = resolve(now, &policy);

        prop_assert_eq!(window, resolve(now, &policy));
        prop_assert!(window.stop >= now, "window already over: {} at {}", window, now);
        prop_assert_eq!(window.duration(), policy.duration());
        prop_assert_eq!(window.start.time(), policy.start_time());
        prop_assert!(policy.class().occurs_on(window.start.weekday()));
        prop_assert!(window.start.date() >= now.date());
    }

    #[test]
    fn resolved_window_is_the_earliest_eligible_one(policy in policy_strategy(), now in instant_strategy()) {
        let expected = (0..=7)
            .map(|k| now.date() + TimeDelta::days(k))
            .filter(|d| policy.class().occurs_on(d.weekday()))
            .map(|d| {
                let start = d.and_time(policy.start_time());
                Window::new(start, start + policy.duration())
            })
            .find(|w| w.stop >= now)
            .expect("every class occurs within a week");

        prop_assert_eq!(resolve(now, &policy), expected);
    }

    #[test]
    fn later_instants_before_the_stop_resolve_to_the_same_window(
        policy in policy_strategy(),
        now in instant_strategy(),
        frac in 0.0f64..=1.0,
    ) {
        let window = resolve(now, &policy);
        let span = (window.stop - now).num_seconds();
        let later = now + TimeDelta::seconds((span as f64 * frac) as i64);

        // A window that started on an earlier day is not looked up again.
        prop_assume!(later.date() <= window.start.date());
        prop_assert_eq!(resolve(later, &policy), window);
    }
}

fn descriptor(policy: RecurrencePolicy) -> ProgramDescriptor {
    ProgramDescriptor {
        name: "Simulated".to_string(),
        station: "TEST".to_string(),
        url: "http://stream.example.invalid/live".to_string(),
        policy,
        dest_dir: "/rec".into(),
        file_root: "_SIM_".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Over eight simulated days, every occurrence that lies wholly inside
    /// the simulated span is recorded exactly once, started inside its window
    /// and stopped within one interval of its end.
    #[test]
    fn each_window_is_recorded_exactly_once(
        class in class_strategy(),
        h in 0u32..24,
        m in 0u32..60,
        dur_min in 2u32..=12 * 60,
        interval_pct in 1u32..100,
        t0 in instant_strategy(),
    ) {
        let policy = RecurrencePolicy::new(class, h, m, dur_min * 60).expect("valid policy");
        let duration_secs = i64::from(dur_min) * 60;
        let interval_secs = (duration_secs * i64::from(interval_pct) / 100).clamp(30, duration_secs - 1);
        let interval = TimeDelta::seconds(interval_secs);

        let engine = FakeCaptureEngine::new();
        let fs = MockFileSystem::new();
        let mut ctl = controller_for(descriptor(policy), Arc::new(engine.clone()), &fs);

        let end = t0 + TimeDelta::days(8);
        let mut starts: HashMap<Window, usize> = HashMap::new();
        let mut stops: HashMap<Window, usize> = HashMap::new();
        let mut now = t0;
        let mut last_tick = t0;

        while now <= end {
            for event in ctl.tick(now) {
                match event {
                    ProgramEvent::RecordingStarted { window, .. } => {
                        prop_assert!(window.contains(now));
                        *starts.entry(window).or_default() += 1;
                    }
                    ProgramEvent::RecordingStopped { window, clean, .. } => {
                        prop_assert!(clean);
                        prop_assert!(now >= window.stop && now < window.stop + interval);
                        *stops.entry(window).or_default() += 1;
                    }
                    ProgramEvent::WindowResolved { .. } => {}
                    ProgramEvent::StartFailed { reason, .. } => {
                        prop_assert!(false, "unexpected start failure: {}", reason);
                    }
                }
            }
            last_tick = now;
            now += interval;
        }

        prop_assert!(starts.values().all(|&n| n == 1), "duplicate start: {:?}", starts);
        prop_assert!(stops.values().all(|&n| n == 1), "duplicate stop: {:?}", stops);

        let all = occurrences(&policy, t0, end);
        for window in starts.keys() {
            prop_assert!(all.contains(window), "started a window the policy never produces: {}", window);
        }
        for window in all.iter().filter(|w| w.start >= t0 && w.stop <= last_tick) {
            prop_assert_eq!(starts.get(window), Some(&1), "missed {}", window);
            prop_assert_eq!(stops.get(window), Some(&1), "never stopped {}", window);
        }

        // At most one recording can still be open at the end.
        prop_assert!(starts.len() - stops.len() <= 1);
        prop_assert!(engine.running().len() <= 1);
    }
}
