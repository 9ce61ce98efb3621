use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use quietspace_core::models::Project;
use quietspace_core::utils::truncate_string;

use crate::app::{App, Focus, ProjectView};
use crate::ui::{heatmap, styles};

use super::{field_line, ready_or_placeholder, wrap_text};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if ready_or_placeholder(frame, area, "Projects", &app.projects).is_none() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_project_list(frame, app, chunks[0]);

    let focused = matches!(app.focus, Focus::Detail);
    match app.selected_project() {
        Some(project) => match app.project_view {
            ProjectView::Overview => render_overview(frame, app, project, chunks[1], focused),
            ProjectView::Logs => render_logs(frame, app, chunks[1], focused),
            ProjectView::Chart => render_chart(frame, app, chunks[1], focused),
        },
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused));
            let paragraph = Paragraph::new(Span::styled(
                "No projects match the current filters",
                styles::muted_style(),
            ))
            .block(block);
            frame.render_widget(paragraph, chunks[1]);
        }
    }
}

fn render_project_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Category"),
        Cell::from("Status"),
        Cell::from("Date"),
    ])
    .style(styles::title_style())
    .height(1);

    let projects = app.filtered_projects();
    let rows: Vec<Row> = projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let style = if i == app.project_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(project.title.as_str()),
                Cell::from(truncate_string(&project.category, 12)),
                Cell::from(truncate_string(&project.status, 10)),
                Cell::from(project.date.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let filter = &app.project_filter;
    let mut title = format!(
        " Projects ({}) - [c] {} [s] {} ",
        projects.len(),
        filter.category.as_deref().unwrap_or("all"),
        filter.status.as_deref().unwrap_or("all"),
    );
    if !filter.search.is_empty() {
        title.push_str(&format!("· \"{}\" ", filter.search));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.project_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_overview(frame: &mut Frame, app: &App, project: &Project, area: Rect, focused: bool) {
    let width = (area.width as usize).saturating_sub(4);
    let mut lines = vec![
        Line::from(Span::styled(project.title.clone(), styles::title_style())),
        Line::from(""),
        field_line("Category", project.category.clone()),
        field_line("Status", project.status.clone()),
        field_line("Tag", project.tag.clone()),
        field_line("Started", project.date.clone()),
        field_line("Duration", project.duration.clone()),
        field_line("Image", project.image.api_url(&app.config.api_base_url)),
    ];
    if let Some(ref github) = project.github {
        lines.push(field_line("GitHub", github.clone()));
    }
    if let Some(ref link) = project.link {
        lines.push(field_line("Link", link.clone()));
    }

    lines.push(Line::from(""));
    for line in wrap_text(&project.description, width) {
        lines.push(Line::from(line));
    }

    if !project.tech_stack.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Tech stack", styles::highlight_style())));
        lines.push(Line::from(format!("  {}", project.tech_stack.join(" · "))));
    }

    if !project.features.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Features", styles::highlight_style())));
        for feature in &project.features {
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::highlight_style()),
                Span::raw(feature.clone()),
            ]));
        }
    }

    let gallery = project.gallery_urls(&app.config.api_base_url);
    if !gallery.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Gallery ({})", gallery.len()),
            styles::highlight_style(),
        )));
        for url in gallery {
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::highlight_style()),
                Span::raw(url),
            ]));
        }
    }

    if let Some(ref challenges) = project.challenges {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Challenges", styles::highlight_style())));
        for line in wrap_text(challenges, width) {
            lines.push(Line::from(line));
        }
    }

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let logs = app.selected_project_logs();

    let block = Block::default()
        .title(format!(" Dev logs ({}) ", logs.len()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if logs.is_empty() {
        let message = if app.articles.ready().is_some() {
            "No development logs for this project yet"
        } else {
            "Development logs appear once articles have loaded"
        };
        let paragraph = Paragraph::new(Span::styled(message, styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([Cell::from("Date"), Cell::from("Title"), Cell::from("Read")])
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = logs
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let style = if focused && i == app.log_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(article.date.as_str()),
                Cell::from(article.title.as_str()),
                Cell::from(article.read_time.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Length(11), Constraint::Fill(1), Constraint::Length(8)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.log_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let Some(grid) = app.project_grid() else {
        let paragraph = Paragraph::new(Span::styled("Chart unavailable", styles::error_style()))
            .block(Block::default().borders(Borders::ALL).border_style(styles::border_style(focused)));
        frame.render_widget(paragraph, area);
        return;
    };

    let range = app.project_year_range();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("[y/Y] ", styles::help_key_style()),
            Span::styled(
                format!("{}..{}", range.start(), range.end()),
                styles::muted_style(),
            ),
            Span::styled("   [ ] ", styles::help_key_style()),
            Span::styled("month", styles::muted_style()),
        ]),
        Line::from(""),
    ];
    lines.extend(heatmap::grid_lines(&grid));

    let block = Block::default()
        .title(format!(" Contributions · {} ", heatmap::grid_title(&grid)))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
