//! GitHub-style contribution heatmap.
//!
//! `build_grid` buckets dated events by calendar day, assigns each day an
//! intensity level 0..=4 using a `LevelPolicy`, and lays the days out either
//! as a month calendar (weeks as rows) or as a full year (weeks as columns,
//! with month label positions). The grid holds values only; drawing is left
//! to the caller.

pub mod grid;
pub mod level;

pub use grid::{build_grid, DayCell, GridError, GridLayout, GridOptions, HeatmapGrid, MonthLabel, Slot};
pub use level::{LevelPolicy, MAX_LEVEL};
