//! Contribution calendar layout
//!
//! Turns a sparse, date-ordered list of daily counts into the fixed
//! week-by-weekday matrix the heatmap is drawn from:
//! - [`grid`] places counts on a 7 x 52 grid anchored at a Sunday
//! - [`intensity`] quantizes counts into the five heatmap levels

pub mod grid;
pub mod intensity;

pub use grid::{month_label_row, week_anchor, ContributionGrid, CELL_WIDTH, DAYS_PER_WEEK, WEEKS};
pub use intensity::IntensityLevel;
