//! Contribution totals and streaks.
//!
//! Everything here is recomputed from the full contribution sequence on each
//! call; nothing is cached between refreshes.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, Local, NaiveDate};

use crate::types::Contribution;

/// Aggregate statistics over a contribution sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionStats {
    /// Sum of all counts
    pub total: u64,
    /// Days with a non-zero count
    pub active_days: usize,
    /// Number of entries in the sequence
    pub total_days: usize,
    /// `total / total_days`, rounded down; 0 for an empty sequence
    pub average_per_day: u64,
    /// Highest single-day count
    pub max_day: u32,
}

impl ContributionStats {
    /// Single pass over the sequence.
    pub fn compute(contributions: &[Contribution]) -> Self {
        let mut stats = Self {
            total_days: contributions.len(),
            ..Self::default()
        };

        for contribution in contributions {
            stats.total += u64::from(contribution.count);
            if contribution.count > 0 {
                stats.active_days += 1;
            }
            stats.max_day = stats.max_day.max(contribution.count);
        }

        if stats.total_days > 0 {
            stats.average_per_day = stats.total / stats.total_days as u64;
        }

        stats
    }
}

impl fmt::Display for ContributionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} contributions | Active: {}/{} days | Avg: {}/day | Max: {}/day",
            self.total, self.active_days, self.total_days, self.average_per_day, self.max_day
        )
    }
}

/// Current and longest streak, in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
}

impl StreakStats {
    /// Streaks relative to the local calendar date.
    pub fn compute(contributions: &[Contribution]) -> Self {
        Self::compute_as_of(contributions, Local::now().date_naive())
    }

    pub fn compute_as_of(contributions: &[Contribution], today: NaiveDate) -> Self {
        Self {
            current: current_streak_as_of(contributions, today),
            longest: longest_streak(contributions),
        }
    }
}

/// Consecutive active days ending today (or yesterday, if today has no entry
/// or no contributions yet).
pub fn current_streak(contributions: &[Contribution]) -> u32 {
    current_streak_as_of(contributions, Local::now().date_naive())
}

/// [`current_streak`] against an explicit `today`.
///
/// Walks the sequence backwards expecting `today`, then the day before, and
/// so on. A zero count on the expected day ends the streak, except on `today`
/// itself: a quiet or missing today gets one retry at yesterday so a day that
/// is still in progress does not reset the streak. Entries dated after the
/// expected day are skipped.
pub fn current_streak_as_of(contributions: &[Contribution], today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut expected = today;

    for contribution in contributions.iter().rev() {
        match contribution.date.cmp(&expected) {
            Ordering::Greater => continue,
            Ordering::Equal => {
                if contribution.count == 0 {
                    if streak == 0 && expected == today {
                        expected = today - Duration::days(1);
                        continue;
                    }
                    break;
                }
                streak += 1;
                expected -= Duration::days(1);
            }
            Ordering::Less => {
                if streak != 0 || expected != today {
                    break;
                }
                expected = today - Duration::days(1);
                if contribution.date == expected && contribution.count > 0 {
                    streak += 1;
                    expected -= Duration::days(1);
                } else {
                    break;
                }
            }
        }
    }

    streak
}

/// Longest run of consecutive active days anywhere in the sequence.
///
/// A gap in the dates resets the run just like a zero-count day does.
pub fn longest_streak(contributions: &[Contribution]) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for contribution in contributions {
        if current > 0 {
            let consecutive = previous
                .map(|prev| contribution.date == prev + Duration::days(1))
                .unwrap_or(false);
            if !consecutive {
                current = 0;
            }
        }

        if contribution.count > 0 {
            current += 1;
            longest = longest.max(current);
            previous = Some(contribution.date);
        } else {
            current = 0;
        }
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive days starting at `start` with the given counts.
    fn run(start: NaiveDate, counts: &[u32]) -> Vec<Contribution> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Contribution::new(start + Duration::days(i as i64), count))
            .collect()
    }

    #[test]
    fn test_stats_empty() {
        let stats = ContributionStats::compute(&[]);
        assert_eq!(stats, ContributionStats::default());
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.average_per_day, 0);
    }

    #[test]
    fn test_stats_average_floors() {
        let stats = ContributionStats::compute(&run(date(2024, 3, 1), &[3, 0, 4]));
        assert_eq!(stats.total, 7);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.average_per_day, 2);
        assert_eq!(stats.max_day, 4);
        assert_eq!(
            stats.to_string(),
            "Total: 7 contributions | Active: 2/3 days | Avg: 2/day | Max: 4/day"
        );
    }

    #[test]
    fn test_current_streak_broken_by_zero() {
        let today = date(2024, 3, 3);
        let contributions = run(date(2024, 3, 1), &[3, 0, 5]);
        assert_eq!(current_streak_as_of(&contributions, today), 1);
    }

    #[test]
    fn test_current_streak_grace_for_missing_today() {
        // Last entry is yesterday: the streak still counts
        let today = date(2024, 3, 4);
        let contributions = run(date(2024, 3, 1), &[1, 2, 3]);
        assert_eq!(current_streak_as_of(&contributions, today), 3);
    }

    #[test]
    fn test_current_streak_grace_for_quiet_today() {
        // Nothing yet today: yesterday's run is still going
        let today = date(2024, 3, 3);
        let contributions = run(date(2024, 3, 1), &[1, 2, 0]);
        assert_eq!(current_streak_as_of(&contributions, today), 2);
    }

    #[test]
    fn test_current_streak_grace_is_used_once() {
        // Quiet today and quiet yesterday: the retry finds a zero and stops
        let today = date(2024, 3, 3);
        let contributions = run(date(2024, 3, 1), &[1, 0, 0]);
        assert_eq!(current_streak_as_of(&contributions, today), 0);

        // A zero further back still ends the walk after the retry
        let contributions = run(date(2024, 3, 1), &[4, 0, 2, 0]);
        assert_eq!(current_streak_as_of(&contributions, date(2024, 3, 4)), 1);
    }

    #[test]
    fn test_current_streak_stale_data() {
        // Most recent activity two days ago: no grace beyond yesterday
        let today = date(2024, 3, 5);
        let contributions = run(date(2024, 3, 1), &[1, 2, 3]);
        assert_eq!(current_streak_as_of(&contributions, today), 0);
    }

    #[test]
    fn test_current_streak_skips_future_entries() {
        let today = date(2024, 3, 3);
        let contributions = run(date(2024, 3, 1), &[1, 1, 1, 0, 0]);
        assert_eq!(current_streak_as_of(&contributions, today), 3);
    }

    #[test]
    fn test_longest_streak_detects_gaps() {
        let mut contributions = run(date(2024, 1, 1), &[1, 1, 1]);
        // Jan 4 missing from the sequence entirely
        contributions.extend(run(date(2024, 1, 5), &[2, 2]));
        assert_eq!(longest_streak(&contributions), 3);
    }

    #[test]
    fn test_fourteen_day_run() {
        let today = date(2024, 6, 30);
        let contributions = run(today - Duration::days(13), &[2; 14]);
        let streaks = StreakStats::compute_as_of(&contributions, today);
        assert_eq!(streaks.longest, 14);
        assert_eq!(streaks.current, 14);
    }

    #[test]
    fn test_longest_at_least_current() {
        let today = date(2024, 2, 10);
        let counts = [0, 4, 4, 0, 1, 1, 1, 1, 0, 2];
        let contributions = run(today - Duration::days(counts.len() as i64 - 1), &counts);
        let streaks = StreakStats::compute_as_of(&contributions, today);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 4);
        assert!(streaks.longest >= streaks.current);
    }

    #[test]
    fn test_empty_streaks() {
        assert_eq!(current_streak_as_of(&[], date(2024, 1, 1)), 0);
        assert_eq!(longest_streak(&[]), 0);
    }
}
