//! Drawing for `HeatmapGrid`, used by the project contribution chart and the
//! Codeforces submission calendar.

use chrono::{Datelike, Weekday};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use quietspace_core::heatmap::{GridLayout, HeatmapGrid, LevelPolicy, Slot, MAX_LEVEL};

use super::styles;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Character drawn for each day in the year layout
const YEAR_CELL: &str = "■ ";

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("???")
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Title such as "2024" or "March 2024"
pub fn grid_title(grid: &HeatmapGrid) -> String {
    match grid.month {
        Some(m) => format!("{} {}", month_name(m), grid.year),
        None => grid.year.to_string(),
    }
}

pub fn grid_lines(grid: &HeatmapGrid) -> Vec<Line<'static>> {
    let mut lines = match grid.layout {
        GridLayout::Month => month_lines(grid),
        GridLayout::Year => year_lines(grid),
    };
    lines.push(Line::from(""));
    lines.push(legend_line(grid.policy));
    lines.push(Line::from(Span::styled(
        format!(
            "{} in total on {} active days (busiest day: {})",
            grid.total_count, grid.active_days, grid.max_count
        ),
        styles::muted_style(),
    )));
    lines
}

/// Month layout: a weekday header, then one row per week with day numbers
/// on a background colored by level
fn month_lines(grid: &HeatmapGrid) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(grid.weeks.len() + 1);

    if let Some(first_week) = grid.weeks.first() {
        let header: Vec<Span> = first_week
            .iter()
            .map(|slot| Span::styled(format!("{:>3} ", weekday_label(slot.date().weekday())), styles::muted_style()))
            .collect();
        lines.push(Line::from(header));
    }

    for week in &grid.weeks {
        let mut spans = Vec::with_capacity(week.len() * 2);
        for slot in week {
            match slot {
                Slot::Day(cell) => {
                    let mut style = Style::default()
                        .bg(styles::HEAT_LEVELS[cell.level.min(MAX_LEVEL) as usize])
                        .fg(Color::White);
                    if cell.is_today {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    spans.push(Span::styled(format!("{:>3}", cell.date.day()), style));
                }
                Slot::Filler(date) => {
                    spans.push(Span::styled(format!("{:>3}", date.day()), Style::default().fg(Color::DarkGray)));
                }
            }
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Year layout: month labels over week columns, one row per weekday
fn year_lines(grid: &HeatmapGrid) -> Vec<Line<'static>> {
    let cell_width = YEAR_CELL.chars().count();
    let gutter = "    ";
    let mut lines = Vec::with_capacity(9);

    // Month labels, skipping any that would overlap the previous one
    let mut label_row = String::from(gutter);
    for label in &grid.month_labels {
        let position = gutter.len() + label.column * cell_width;
        if position >= label_row.chars().count() {
            let pad = position - label_row.chars().count();
            label_row.push_str(&" ".repeat(pad));
            label_row.push_str(month_name(label.month));
        }
    }
    lines.push(Line::from(Span::styled(label_row, styles::muted_style())));

    for row in 0..7 {
        let weekday = grid
            .weeks
            .first()
            .and_then(|w| w.get(row))
            .map(|slot| slot.date().weekday());
        // Label Monday, Wednesday and Friday only
        let label = match weekday {
            Some(day @ (Weekday::Mon | Weekday::Wed | Weekday::Fri)) => weekday_label(day),
            _ => "",
        };

        let mut spans = vec![Span::styled(format!("{:<4}", label), styles::muted_style())];
        for week in &grid.weeks {
            match week.get(row) {
                Some(Slot::Day(cell)) if cell.is_today => {
                    spans.push(Span::styled(YEAR_CELL, styles::today_style(cell.level)));
                }
                Some(Slot::Day(cell)) => {
                    spans.push(Span::styled(YEAR_CELL, styles::heat_style(cell.level)));
                }
                _ => spans.push(Span::raw(" ".repeat(cell_width))),
            }
        }
        lines.push(Line::from(spans));
    }

    lines
}

pub fn legend_line(policy: LevelPolicy) -> Line<'static> {
    let mut spans = vec![Span::styled("Less ", styles::muted_style())];
    for (level, label) in policy.legend().iter().enumerate() {
        spans.push(Span::styled("■", styles::heat_style(level as u8)));
        spans.push(Span::styled(format!(" {}  ", label), styles::muted_style()));
    }
    spans.push(Span::styled("More", styles::muted_style()));
    Line::from(spans)
}
