use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use quietspace_core::utils::truncate_string;

use crate::app::{App, Focus};
use crate::ui::styles;

use super::{field_line, ready_or_placeholder, wrap_text};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if ready_or_placeholder(frame, area, "Videos", &app.videos).is_none() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_video_list(frame, app, chunks[0]);
    render_video_detail(frame, app, chunks[1]);
}

fn render_video_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);
    let videos = app.video_list();

    let header = Row::new([Cell::from("Title"), Cell::from("Description")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = videos
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let style = if i == app.video_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(video.title.as_str()),
                Cell::from(truncate_string(&video.description, 40)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Percentage(45), Constraint::Fill(1)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Videos ({}) ", videos.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.video_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_video_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let content = match app.selected_video() {
        Some(video) => {
            let mut lines = vec![
                Line::from(Span::styled(video.title.clone(), styles::title_style())),
                Line::from(""),
            ];
            for line in wrap_text(&video.description, (area.width as usize).saturating_sub(4)) {
                lines.push(Line::from(line));
            }
            lines.push(Line::from(""));
            if let Some(ref embed) = video.embed_url {
                lines.push(field_line("Player", embed.clone()));
            }
            if let Some(ref link) = video.link {
                lines.push(field_line("Link", link.clone()));
            }
            if let Some(ref notes) = video.notes_url {
                lines.push(field_line("Notes", notes.clone()));
            }
            lines
        }
        None => vec![Line::from(Span::styled("No videos", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
