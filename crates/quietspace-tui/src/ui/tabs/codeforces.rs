use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use quietspace_core::models::{CodeforcesProfile, SubmissionStatus};
use quietspace_core::utils::{relative_time, truncate_string};

use crate::app::App;
use crate::ui::{heatmap, styles};

use super::ready_or_placeholder;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(profile) = ready_or_placeholder(frame, area, "Codeforces", &app.codeforces_profile) else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(10)])
        .split(area);

    render_summary(frame, profile, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(rows[1]);

    render_calendar(frame, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(columns[1]);

    render_rating_history(frame, profile, right[0]);
    render_recent_submissions(frame, profile, right[1]);
}

fn render_summary(frame: &mut Frame, profile: &CodeforcesProfile, area: Rect) {
    let user = &profile.user;
    let lines = vec![
        Line::from(vec![
            Span::styled(user.handle.clone(), styles::rating_style(user.rating)),
            Span::styled("  ", styles::muted_style()),
            Span::styled(user.rank_display().to_string(), styles::rating_style(user.rating)),
        ]),
        Line::from(vec![
            Span::styled("Rating ", styles::muted_style()),
            Span::styled(user.rating_display(), styles::rating_style(user.rating)),
            Span::styled("   Max ", styles::muted_style()),
            Span::styled(
                user.max_rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
                styles::rating_style(user.max_rating),
            ),
            Span::styled("   Contests ", styles::muted_style()),
            Span::raw(profile.contest_count().to_string()),
            Span::styled("   Solved ", styles::muted_style()),
            Span::styled(profile.solved_count().to_string(), styles::success_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_calendar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Submissions ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let lines = match app.codeforces_grid() {
        Some(grid) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(heatmap::grid_title(&grid), styles::title_style()),
                    Span::styled("  [ ] y/Y", styles::muted_style()),
                ]),
                Line::from(""),
            ];
            lines.extend(heatmap::grid_lines(&grid));
            lines
        }
        None => vec![Line::from(Span::styled("Calendar unavailable", styles::error_style()))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_rating_history(frame: &mut Frame, profile: &CodeforcesProfile, area: Rect) {
    let floor = profile.chart_floor();
    let data: Vec<u64> = profile
        .rating_history
        .iter()
        .map(|change| (change.new_rating - floor).max(0) as u64)
        .collect();

    let title = match profile.rating_history.last() {
        Some(last) => format!(
            " Rating history · last {} {:+} ({}) ",
            last.new_rating,
            last.delta(),
            last.date_label()
        ),
        None => String::from(" Rating history · no rated contests "),
    };

    // Newest contests stay visible when the history is wider than the panel
    let visible = (area.width.saturating_sub(2) as usize).min(data.len());
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(false)),
        )
        .data(&data[data.len() - visible..])
        .style(styles::rating_style(profile.user.rating));

    frame.render_widget(sparkline, area);
}

fn render_recent_submissions(frame: &mut Frame, profile: &CodeforcesProfile, area: Rect) {
    let now = Local::now();

    let header = Row::new([Cell::from("When"), Cell::from("Problem"), Cell::from("Verdict")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = profile
        .recent_submissions()
        .iter()
        .map(|submission| {
            let when = submission
                .submitted_at()
                .map(|at| relative_time(&at, &now))
                .unwrap_or_else(|| "-".to_string());
            let status = submission.status();
            let status_style = match status {
                SubmissionStatus::Accepted => styles::success_style(),
                SubmissionStatus::Wrong => styles::error_style(),
                SubmissionStatus::Pending => styles::muted_style(),
            };
            Row::new(vec![
                Cell::from(when),
                Cell::from(truncate_string(&submission.problem.display_name(), 40)),
                Cell::from(Span::styled(status.to_string(), status_style)),
            ])
        })
        .collect();

    let widths = [Constraint::Length(17), Constraint::Fill(1), Constraint::Length(9)];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Recent submissions ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}
