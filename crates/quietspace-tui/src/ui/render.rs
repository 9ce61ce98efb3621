use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, ProjectView, Tab};

use super::styles;
use super::tabs::{articles, codeforces, projects, videos};

pub fn render(frame: &mut Frame, app: &App) {
    let searching = matches!(app.state, AppState::Searching);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                              // Title bar
            Constraint::Length(3),                              // Tabs
            Constraint::Min(10),                                // Main content
            Constraint::Length(if searching { 1 } else { 0 }), // Search line
            Constraint::Length(2),                              // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    if searching {
        render_search_line(frame, app, chunks[3]);
    }
    render_status_bar(frame, app, chunks[4]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  quietspace · {}", app.config.codeforces_handle);
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    // Project sub-views on the right
    if app.current_tab == Tab::Projects {
        let detail_tabs = [
            ("Overview", app.project_view == ProjectView::Overview),
            ("Dev logs", app.project_view == ProjectView::Logs),
            ("Chart", app.project_view == ProjectView::Chart),
        ];

        let main_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let detail_width: usize =
            detail_tabs.iter().map(|(l, _)| l.len()).sum::<usize>() + (detail_tabs.len() - 1) * 3;
        let padding = (area.width as usize).saturating_sub(main_width + detail_width + 2);
        spans.push(Span::raw(" ".repeat(padding)));

        for (i, (label, selected)) in detail_tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            if *selected {
                spans.push(Span::styled(*label, styles::tab_style(true)));
            } else {
                spans.push(Span::styled(*label, styles::muted_style()));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Articles => articles::render(frame, app, area),
        Tab::Projects => projects::render(frame, app, area),
        Tab::Videos => videos::render(frame, app, area),
        Tab::Codeforces => codeforces::render(frame, app, area),
    }
}

fn render_search_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" Search: ", styles::search_style()),
        Span::raw(app.search_input.clone()),
        Span::styled("▌", styles::search_style()),
        Span::styled("   Enter keep · Esc clear", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[r]efresh | [/] search | [q]uit";

    let left_text = match (&app.status_message, app.cache_age()) {
        (Some(msg), _) => format!(" {} ", msg),
        (None, Some(age)) => format!(" Cached {} ", age),
        (None, None) => String::from(" "),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc.to_string(), styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 34, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  quietspace", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-4", "Switch tabs"),
        help_line("←/→", "Prev/next tab or project view"),
        help_line("Tab", "Switch focus (list ↔ detail)"),
        help_line("↑/↓ j/k", "Navigate list or scroll article"),
        help_line("PgUp/PgDn", "Move by a page"),
        help_line("Enter", "Open article / retry failed load"),
        help_line("Esc", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search"),
        help_line("x", "Clear filters"),
        help_line("r", "Refresh from the network"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Articles", styles::highlight_style())),
        help_line("c/s/l", "Cycle category level 1/2/3"),
        Line::from(""),
        Line::from(Span::styled(" Projects", styles::highlight_style())),
        help_line("c/s", "Cycle category/status filter"),
        help_line("[ ]", "Chart month (all months between)"),
        help_line("y/Y", "Chart year back/forward"),
        Line::from(""),
        Line::from(Span::styled(" Codeforces", styles::highlight_style())),
        help_line("[ ]", "Calendar month"),
        help_line("y/Y", "Calendar year back/forward"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(42, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
