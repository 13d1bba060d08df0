//! Analytics module for gittui
//!
//! Pure functions over already-fetched data:
//! - [`stats`]: contribution totals, current and longest streak
//! - [`activity`]: push rate and peak coding hour from the event feed
//! - [`repos`]: language breakdown and most-starred repositories
//!
//! Functions that depend on "now" have an `_as_of` / `_at` variant taking
//! the reference time explicitly.

pub mod activity;
pub mod repos;
pub mod stats;

pub use activity::{
    format_hour_range, peak_hour, peak_hour_at, push_rate, PeakHour, PushGranularity, TimeWindow,
    NO_DATA,
};
pub use repos::{top_languages, top_repositories, TOP_N};
pub use stats::{
    current_streak, current_streak_as_of, longest_streak, ContributionStats, StreakStats,
};
