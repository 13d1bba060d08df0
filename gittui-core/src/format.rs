//! Formatting helpers shared by the dashboard panels.

use chrono::{DateTime, TimeZone, Utc};

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format_relative_time_at(ts, Utc::now())
}

/// [`format_relative_time`] against an explicit `now`.
///
/// Anything older than a week is shown as a short date in the timestamp's
/// own offset, e.g. "Jan 2".
pub fn format_relative_time_at<Tz: TimeZone>(ts: &DateTime<Tz>, now: DateTime<Utc>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let duration = now.signed_duration_since(ts.with_timezone(&Utc));

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %-d").to_string()
    }
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Compact count for stars and followers (e.g. "1.2k").
pub fn format_count(value: u32) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", f64::from(value) / 1_000_000.0)
    } else if value >= 10_000 {
        format!("{:.0}k", f64::from(value) / 1_000.0)
    } else if value >= 1_000 {
        format!("{:.1}k", f64::from(value) / 1_000.0)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = now();
        assert_eq!(format_relative_time_at(&(now - Duration::seconds(5)), now), "just now");
        assert_eq!(format_relative_time_at(&(now + Duration::minutes(3)), now), "just now");
        assert_eq!(format_relative_time_at(&(now - Duration::minutes(42)), now), "42m ago");
        assert_eq!(format_relative_time_at(&(now - Duration::hours(5)), now), "5h ago");
        assert_eq!(format_relative_time_at(&(now - Duration::days(6)), now), "6d ago");
        assert_eq!(format_relative_time_at(&(now - Duration::days(73)), now), "Jan 2");
    }

    #[test]
    fn test_relative_time_with_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = (now() - Duration::hours(2)).with_timezone(&offset);
        assert_eq!(format_relative_time_at(&ts, now()), "2h ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2k");
        assert_eq!(format_count(45_600), "46k");
        assert_eq!(format_count(2_500_000), "2.5M");
    }
}
