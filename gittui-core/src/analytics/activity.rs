//! Push frequency and peak coding hour from the activity feed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Local, Timelike};
use serde::Deserialize;

use crate::types::ActivityEvent;

/// Label used when no events fall inside the window.
pub const NO_DATA: &str = "No data";

/// Time unit a push rate is normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushGranularity {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl PushGranularity {
    pub const ALL: [PushGranularity; 4] = [
        PushGranularity::Hour,
        PushGranularity::Day,
        PushGranularity::Week,
        PushGranularity::Month,
    ];

    /// Length of one unit in hours. A month counts as 30 days.
    pub fn hours(self) -> f64 {
        match self {
            PushGranularity::Hour => 1.0,
            PushGranularity::Day => 24.0,
            PushGranularity::Week => 168.0,
            PushGranularity::Month => 720.0,
        }
    }

    /// Next granularity in the hour, day, week, month rotation.
    pub fn next(self) -> Self {
        match self {
            PushGranularity::Hour => PushGranularity::Day,
            PushGranularity::Day => PushGranularity::Week,
            PushGranularity::Week => PushGranularity::Month,
            PushGranularity::Month => PushGranularity::Hour,
        }
    }

    /// Stat label, e.g. "Pushes/Day".
    pub fn label(self) -> &'static str {
        match self {
            PushGranularity::Hour => "Pushes/Hour",
            PushGranularity::Day => "Pushes/Day",
            PushGranularity::Week => "Pushes/Week",
            PushGranularity::Month => "Pushes/Month",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PushGranularity::Hour => "hour",
            PushGranularity::Day => "day",
            PushGranularity::Week => "week",
            PushGranularity::Month => "month",
        }
    }
}

impl fmt::Display for PushGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PushGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(PushGranularity::Hour),
            "day" | "daily" => Ok(PushGranularity::Day),
            "week" | "weekly" => Ok(PushGranularity::Week),
            "month" | "monthly" => Ok(PushGranularity::Month),
            _ => Err(format!(
                "unknown granularity: {} (expected hour, day, week or month)",
                s
            )),
        }
    }
}

/// Rolling lookback window for the peak-hour stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[default]
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl TimeWindow {
    /// Window length in days.
    pub fn days(self) -> i64 {
        match self {
            TimeWindow::ThisWeek => 7,
            TimeWindow::ThisMonth => 30,
            TimeWindow::ThisYear => 365,
        }
    }

    /// Earliest timestamp still inside the window.
    pub fn cutoff(self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        now - Duration::days(self.days())
    }

    pub fn next(self) -> Self {
        match self {
            TimeWindow::ThisWeek => TimeWindow::ThisMonth,
            TimeWindow::ThisMonth => TimeWindow::ThisYear,
            TimeWindow::ThisYear => TimeWindow::ThisWeek,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeWindow::ThisWeek => "This Week",
            TimeWindow::ThisMonth => "This Month",
            TimeWindow::ThisYear => "This Year",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "week" | "this_week" => Ok(TimeWindow::ThisWeek),
            "month" | "this_month" => Ok(TimeWindow::ThisMonth),
            "year" | "this_year" => Ok(TimeWindow::ThisYear),
            _ => Err(format!(
                "unknown time window: {} (expected week, month or year)",
                s
            )),
        }
    }
}

/// Push events per unit of `granularity`.
///
/// The rate spreads all push events over the span between the oldest and
/// newest push. When every push shares a timestamp the span counts as one
/// unit of `granularity`. No pushes gives exactly `0.0`.
pub fn push_rate(events: &[ActivityEvent], granularity: PushGranularity) -> f64 {
    let mut pushes = events.iter().filter(|e| e.kind.is_push());
    let Some(first) = pushes.next() else {
        return 0.0;
    };

    let mut count = 1u32;
    let mut oldest = first.timestamp;
    let mut newest = first.timestamp;
    for event in pushes {
        count += 1;
        oldest = oldest.min(event.timestamp);
        newest = newest.max(event.timestamp);
    }

    let span_hours = (newest - oldest).num_seconds() as f64 / 3600.0;
    let units = if span_hours > 0.0 {
        span_hours / granularity.hours()
    } else {
        1.0
    };

    f64::from(count) / units
}

/// Most active hour of day within a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakHour {
    /// Formatted range such as "2-3pm", or [`NO_DATA`]
    pub label: String,
    /// Winning hour (0-23), `None` when there were no events
    pub hour: Option<u32>,
    /// Event count per hour of day; only hours with events are present
    pub distribution: BTreeMap<u32, u32>,
}

impl PeakHour {
    pub fn has_data(&self) -> bool {
        self.hour.is_some()
    }
}

/// Peak hour over the local clock's `now`.
pub fn peak_hour(events: &[ActivityEvent], window: TimeWindow) -> PeakHour {
    peak_hour_at(events, window, Local::now().fixed_offset())
}

/// Peak hour for events at or after `window.cutoff(now)`.
///
/// Events are bucketed by the hour of their own (local) timestamp. Hours are
/// scanned in ascending order and only a strictly greater count replaces the
/// current best, so ties go to the earliest hour.
pub fn peak_hour_at(
    events: &[ActivityEvent],
    window: TimeWindow,
    now: DateTime<FixedOffset>,
) -> PeakHour {
    let cutoff = window.cutoff(now);

    let mut distribution: BTreeMap<u32, u32> = BTreeMap::new();
    for event in events.iter().filter(|e| e.timestamp >= cutoff) {
        *distribution.entry(event.timestamp.hour()).or_insert(0) += 1;
    }

    let mut best: Option<(u32, u32)> = None;
    for (&hour, &count) in &distribution {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((hour, count));
        }
    }

    match best {
        Some((hour, _)) => PeakHour {
            label: hour_range_label(hour),
            hour: Some(hour),
            distribution,
        },
        None => PeakHour {
            label: NO_DATA.to_string(),
            hour: None,
            distribution,
        },
    }
}

/// 12-hour clock display for an hour of day: `(hour, "AM" | "PM")`.
fn twelve_hour(hour: u32) -> (u32, &'static str) {
    match hour % 24 {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    }
}

/// Label for the one-hour range starting at `hour`.
fn hour_range_label(hour: u32) -> String {
    let (start, start_meridiem) = twelve_hour(hour);
    let (end, end_meridiem) = twelve_hour((hour + 1) % 24);
    format_hour_range(start, start_meridiem, end, end_meridiem)
}

/// Format an hour range, sharing the meridiem when both ends agree.
///
/// `format_hour_range(2, "PM", 3, "PM")` is `"2-3pm"`;
/// `format_hour_range(11, "AM", 12, "PM")` is `"11am-12pm"`.
pub fn format_hour_range(start: u32, start_meridiem: &str, end: u32, end_meridiem: &str) -> String {
    let start_meridiem = start_meridiem.to_lowercase();
    let end_meridiem = end_meridiem.to_lowercase();

    if start_meridiem == end_meridiem {
        format!("{}-{}{}", start, end, end_meridiem)
    } else {
        format!("{}{}-{}{}", start, start_meridiem, end, end_meridiem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        utc().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn event(kind: EventKind, timestamp: DateTime<FixedOffset>) -> ActivityEvent {
        ActivityEvent {
            kind,
            repository: "octocat/hello-world".to_string(),
            action: String::new(),
            timestamp,
            is_public: true,
        }
    }

    fn push(timestamp: DateTime<FixedOffset>) -> ActivityEvent {
        event(EventKind::Push, timestamp)
    }

    #[test]
    fn test_format_hour_range() {
        assert_eq!(format_hour_range(11, "AM", 12, "PM"), "11am-12pm");
        assert_eq!(format_hour_range(2, "PM", 3, "PM"), "2-3pm");
        assert_eq!(format_hour_range(9, "am", 10, "AM"), "9-10am");
    }

    #[test]
    fn test_hour_range_label() {
        assert_eq!(hour_range_label(0), "12-1am");
        assert_eq!(hour_range_label(11), "11am-12pm");
        assert_eq!(hour_range_label(12), "12-1pm");
        assert_eq!(hour_range_label(14), "2-3pm");
        assert_eq!(hour_range_label(23), "11pm-12am");
    }

    #[test]
    fn test_push_rate_no_pushes() {
        assert_eq!(push_rate(&[], PushGranularity::Day), 0.0);
        let events = [event(EventKind::Watch, at(2024, 5, 1, 10, 0))];
        assert_eq!(push_rate(&events, PushGranularity::Hour), 0.0);
    }

    #[test]
    fn test_push_rate_full_span() {
        // 4 pushes over 2 days
        let events = [
            push(at(2024, 5, 1, 0, 0)),
            event(EventKind::Create, at(2024, 5, 1, 6, 0)),
            push(at(2024, 5, 2, 0, 0)),
            push(at(2024, 5, 2, 12, 0)),
            push(at(2024, 5, 3, 0, 0)),
        ];
        assert!((push_rate(&events, PushGranularity::Day) - 2.0).abs() < 1e-9);
        assert!((push_rate(&events, PushGranularity::Hour) - 4.0 / 48.0).abs() < 1e-9);
        assert!((push_rate(&events, PushGranularity::Week) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_push_rate_zero_span_is_one_unit() {
        let ts = at(2024, 5, 1, 9, 30);
        let events = [push(ts), push(ts), push(ts)];
        for granularity in PushGranularity::ALL {
            assert_eq!(push_rate(&events, granularity), 3.0);
        }
    }

    #[test]
    fn test_peak_hour_no_data() {
        let now = at(2024, 5, 10, 12, 0);
        let old = [push(at(2024, 4, 1, 14, 0))];
        let peak = peak_hour_at(&old, TimeWindow::ThisWeek, now);
        assert_eq!(peak.label, NO_DATA);
        assert!(peak.distribution.is_empty());
        assert!(!peak.has_data());
    }

    #[test]
    fn test_peak_hour_tie_breaks_low() {
        let now = at(2024, 5, 10, 23, 0);
        let events = [
            push(at(2024, 5, 9, 15, 10)),
            push(at(2024, 5, 9, 15, 40)),
            push(at(2024, 5, 8, 9, 5)),
            push(at(2024, 5, 7, 9, 55)),
        ];
        let peak = peak_hour_at(&events, TimeWindow::ThisWeek, now);
        assert_eq!(peak.hour, Some(9));
        assert_eq!(peak.label, "9-10am");
        assert_eq!(peak.distribution.get(&9), Some(&2));
        assert_eq!(peak.distribution.get(&15), Some(&2));
    }

    #[test]
    fn test_peak_hour_respects_window() {
        let now = at(2024, 5, 31, 12, 0);
        let events = [
            push(at(2024, 5, 30, 14, 0)),
            // 20 days back: outside the week, inside the month
            push(at(2024, 5, 11, 8, 0)),
            push(at(2024, 5, 11, 8, 30)),
        ];
        let week = peak_hour_at(&events, TimeWindow::ThisWeek, now);
        assert_eq!(week.label, "2-3pm");
        assert_eq!(week.distribution.len(), 1);

        let month = peak_hour_at(&events, TimeWindow::ThisMonth, now);
        assert_eq!(month.label, "8-9am");
    }

    #[test]
    fn test_peak_hour_uses_event_offset() {
        let pacific = FixedOffset::west_opt(7 * 3600).unwrap();
        let ts = pacific.with_ymd_and_hms(2024, 5, 9, 22, 0, 0).unwrap();
        let now = at(2024, 5, 10, 12, 0);
        let peak = peak_hour_at(&[push(ts)], TimeWindow::ThisWeek, now);
        assert_eq!(peak.hour, Some(22));
        assert_eq!(peak.label, "10-11pm");
    }

    #[test]
    fn test_granularity_cycle() {
        let mut g = PushGranularity::Hour;
        let mut seen = vec![g];
        for _ in 0..3 {
            g = g.next();
            seen.push(g);
        }
        assert_eq!(seen, PushGranularity::ALL.to_vec());
        assert_eq!(g.next(), PushGranularity::Hour);
        assert_eq!(PushGranularity::Week.label(), "Pushes/Week");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Weekly".parse::<PushGranularity>(), Ok(PushGranularity::Week));
        assert!("fortnight".parse::<PushGranularity>().is_err());
        assert_eq!("this-month".parse::<TimeWindow>(), Ok(TimeWindow::ThisMonth));
        assert_eq!("year".parse::<TimeWindow>(), Ok(TimeWindow::ThisYear));
        assert_eq!(TimeWindow::ThisYear.next(), TimeWindow::ThisWeek);
        assert_eq!(TimeWindow::ThisMonth.to_string(), "This Month");
    }
}
