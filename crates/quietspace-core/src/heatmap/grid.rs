use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use thiserror::Error;

use super::LevelPolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid calendar range: year {year}, month {month:?}")]
    InvalidRange { year: i32, month: Option<u32> },
}

/// How `HeatmapGrid::weeks` should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLayout {
    /// One month; each week is a row of 7 cells
    Month,
    /// One year; each week is a column of 7 cells, Monday on top
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub policy: LevelPolicy,
    /// First day of each week in the month layout. The year layout always
    /// starts weeks on Monday.
    pub first_weekday: Weekday,
    /// Day to flag with `DayCell::is_today`
    pub today: Option<NaiveDate>,
}

impl GridOptions {
    pub fn new(policy: LevelPolicy) -> Self {
        Self {
            policy,
            first_weekday: Weekday::Sun,
            today: None,
        }
    }

    pub fn first_weekday(mut self, weekday: Weekday) -> Self {
        self.first_weekday = weekday;
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
    pub is_today: bool,
}

/// One position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A day inside the requested range
    Day(DayCell),
    /// Alignment padding from the adjacent month or year. Carries no count or
    /// level and is not meant to be interactive.
    Filler(NaiveDate),
}

impl Slot {
    pub fn date(&self) -> NaiveDate {
        match self {
            Slot::Day(cell) => cell.date,
            Slot::Filler(date) => *date,
        }
    }

    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Slot::Day(cell) => Some(cell),
            Slot::Filler(_) => None,
        }
    }
}

/// Week index at which a month's first day falls (year layout only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLabel {
    /// 1..=12
    pub month: u32,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapGrid {
    pub layout: GridLayout,
    pub year: i32,
    pub month: Option<u32>,
    pub policy: LevelPolicy,
    /// Chronological weeks of exactly 7 slots each
    pub weeks: Vec<Vec<Slot>>,
    /// Empty for the month layout
    pub month_labels: Vec<MonthLabel>,
    /// Events counted inside the range
    pub total_count: u32,
    /// Days with at least one event
    pub active_days: usize,
    /// Busiest day's count
    pub max_count: u32,
}

impl HeatmapGrid {
    /// Days inside the range, in date order
    pub fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.weeks.iter().flatten().filter_map(Slot::as_day)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }
}

/// First and last day of the requested year or month
fn date_range(year: i32, month: Option<u32>) -> Option<(NaiveDate, NaiveDate)> {
    match month {
        Some(m) => {
            let start = NaiveDate::from_ymd_opt(year, m, 1)?;
            let next = if m == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, m + 1, 1)?
            };
            Some((start, next.pred_opt()?))
        }
        None => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
    }
}

/// Number of days from `first` forward to `day` within one week
fn days_after(first: Weekday, day: Weekday) -> u64 {
    ((day.num_days_from_monday() + 7 - first.num_days_from_monday()) % 7) as u64
}

/// Build the heatmap for `year`, or for one `month` (1..=12) of it.
///
/// Events outside the range are ignored; repeated dates accumulate. With a
/// month the grid uses the month layout and `options.first_weekday`; without
/// one it covers the whole year in Monday-first week columns and reports where
/// each month's label goes.
pub fn build_grid<I>(
    events: I,
    year: i32,
    month: Option<u32>,
    options: &GridOptions,
) -> Result<HeatmapGrid, GridError>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let invalid = || GridError::InvalidRange { year, month };
    let (start, end) = date_range(year, month).ok_or_else(invalid)?;

    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for date in events {
        if date >= start && date <= end {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let total_count = counts.values().sum();
    let active_days = counts.len();

    let (layout, first_weekday) = match month {
        Some(_) => (GridLayout::Month, options.first_weekday),
        None => (GridLayout::Year, Weekday::Mon),
    };

    let lead = days_after(first_weekday, start.weekday());
    let total_days = (end - start).num_days() as u64 + 1;
    let total_slots = (lead + total_days).div_ceil(7) * 7;
    let grid_start = start.checked_sub_days(Days::new(lead)).ok_or_else(invalid)?;

    let mut weeks: Vec<Vec<Slot>> = Vec::with_capacity((total_slots / 7) as usize);
    let mut month_labels = Vec::new();

    for offset in 0..total_slots {
        let date = grid_start.checked_add_days(Days::new(offset)).ok_or_else(invalid)?;
        let week = (offset / 7) as usize;
        if week == weeks.len() {
            weeks.push(Vec::with_capacity(7));
        }

        let slot = if date < start || date > end {
            Slot::Filler(date)
        } else {
            let count = counts.get(&date).copied().unwrap_or(0);
            if layout == GridLayout::Year && date.day() == 1 {
                month_labels.push(MonthLabel {
                    month: date.month(),
                    column: week,
                });
            }
            Slot::Day(DayCell {
                date,
                count,
                level: options.policy.level(count, max_count),
                is_today: options.today == Some(date),
            })
        };

        weeks[week].push(slot);
    }

    Ok(HeatmapGrid {
        layout,
        year,
        month,
        policy: options.policy,
        weeks,
        month_labels,
        total_count,
        active_days,
        max_count,
    })
}
