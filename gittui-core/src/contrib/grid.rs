//! Week-aligned contribution grid.

use chrono::{Datelike, Duration, NaiveDate};

use crate::contrib::IntensityLevel;
use crate::types::Contribution;

/// Number of week columns in the calendar.
pub const WEEKS: usize = 52;
/// Rows per week, Sunday first.
pub const DAYS_PER_WEEK: usize = 7;
/// Character columns per week cell (glyph + gap).
pub const CELL_WIDTH: usize = 2;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The Sunday on or before `date`.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Counts laid out as `[day_of_week][week]`, Sunday = row 0.
///
/// Rebuilt from scratch on every call to [`ContributionGrid::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionGrid {
    cells: [[u32; WEEKS]; DAYS_PER_WEEK],
    anchor: Option<NaiveDate>,
}

impl Default for ContributionGrid {
    fn default() -> Self {
        Self {
            cells: [[0; WEEKS]; DAYS_PER_WEEK],
            anchor: None,
        }
    }
}

impl ContributionGrid {
    /// Place contributions on the grid.
    ///
    /// The anchor is the Sunday on or before the first contribution. Entries
    /// falling outside the 52 weeks after the anchor are dropped, and when two
    /// entries map to the same cell the later one wins.
    pub fn build(contributions: &[Contribution]) -> Self {
        let Some(first) = contributions.first() else {
            return Self::default();
        };

        let anchor = week_anchor(first.date);
        let mut grid = Self {
            anchor: Some(anchor),
            ..Self::default()
        };

        for contribution in contributions {
            if let Some((day, week)) = grid.position_of(contribution.date) {
                grid.cells[day][week] = contribution.count;
            }
        }

        grid
    }

    /// The Sunday the first column starts on, `None` for an empty grid.
    pub fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    /// `(day_of_week, week)` cell for a date, if it falls inside the grid.
    pub fn position_of(&self, date: NaiveDate) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let days = (date - anchor).num_days();
        if days < 0 {
            return None;
        }
        let week = usize::try_from(days / 7).ok()?;
        if week >= WEEKS {
            return None;
        }
        let day = date.weekday().num_days_from_sunday() as usize;
        Some((day, week))
    }

    /// Count stored at a cell, 0 outside the grid.
    pub fn count(&self, day: usize, week: usize) -> u32 {
        self.cells
            .get(day)
            .and_then(|row| row.get(week))
            .copied()
            .unwrap_or(0)
    }

    pub fn level(&self, day: usize, week: usize) -> IntensityLevel {
        IntensityLevel::from_count(self.count(day, week))
    }

    /// Rows from Sunday to Saturday.
    pub fn rows(&self) -> impl Iterator<Item = &[u32; WEEKS]> {
        self.cells.iter()
    }

    /// Month abbreviations positioned over the week columns.
    pub fn month_labels(&self) -> String {
        self.anchor.map(month_label_row).unwrap_or_default()
    }
}

/// Build the `WEEKS * CELL_WIDTH` character month row for a grid anchor.
///
/// A label is stamped at a column whenever the month of that week's first
/// day differs from the previous column's; column 0 is always stamped.
/// Labels running past the end of the row are cut off.
pub fn month_label_row(anchor: NaiveDate) -> String {
    let width = WEEKS * CELL_WIDTH;
    let mut row = vec![' '; width];
    let mut current_month = None;

    for week in 0..WEEKS {
        let week_start = anchor + Duration::weeks(week as i64);
        let month = week_start.month0() as usize;
        if current_month == Some(month) {
            continue;
        }
        let start = week * CELL_WIDTH;
        for (slot, ch) in row.iter_mut().skip(start).zip(MONTHS[month].chars()) {
            *slot = ch;
        }
        current_month = Some(month);
    }

    row.into_iter().collect()
}
