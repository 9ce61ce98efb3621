use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use quietspace_core::loader::PageState;
use quietspace_core::utils::truncate_string;

use crate::app::{App, ArticleReader, Focus};
use crate::ui::styles;

use super::{field_line, ready_or_placeholder, wrap_text};

/// Width of the table of contents column in the reader
const TOC_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    if ready_or_placeholder(frame, area, "Articles", &app.articles).is_none() {
        return;
    }

    render_article_list(frame, app, chunks[0]);
    match app.reader {
        Some(ref reader) => render_reader(frame, app, reader, chunks[1]),
        None => render_article_detail(frame, app, chunks[1]),
    }
}

/// "all", or the selected category path such as "Rust / Async"
fn filter_summary(app: &App) -> String {
    let filter = &app.article_filter;
    let path: Vec<&str> = [filter.level1(), filter.level2(), filter.level3()]
        .into_iter()
        .flatten()
        .collect();

    let mut summary = if path.is_empty() {
        String::from("all")
    } else {
        path.join(" / ")
    };
    if !filter.search.is_empty() {
        summary.push_str(&format!(" · \"{}\"", filter.search));
    }
    summary
}

fn render_article_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::List);

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Date"),
        Cell::from("Tag"),
        Cell::from("Read"),
    ])
    .style(styles::title_style())
    .height(1);

    let articles = app.filtered_articles();
    let rows: Vec<Row> = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let style = if i == app.article_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(article.title.as_str()),
                Cell::from(article.date.as_str()),
                Cell::from(truncate_string(&article.tag, 12)),
                Cell::from(article.read_time.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let title = format!(" Articles ({}) - {} ", articles.len(), filter_summary(app));

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
    state.select(Some(app.article_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_article_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);

    let content = match app.selected_article() {
        Some(article) => {
            let mut lines = vec![
                Line::from(Span::styled(article.title.clone(), styles::title_style())),
                Line::from(""),
                field_line("Date", article.date.clone()),
                field_line("Tag", article.tag.clone()),
                field_line("Read", article.read_time.clone()),
                field_line("Category", article.category_path()),
            ];
            if let Some(ref link) = article.link {
                lines.push(field_line("Link", link.clone()));
            }
            lines.push(Line::from(""));
            for line in wrap_text(&article.excerpt, (area.width as usize).saturating_sub(4)) {
                lines.push(Line::from(line));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[Enter]", styles::help_key_style()),
                Span::styled(" read article", styles::muted_style()),
            ]));
            lines
        }
        None => vec![Line::from(Span::styled(
            "No articles match the current filters",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_reader(frame: &mut Frame, app: &App, reader: &ArticleReader, area: Rect) {
    let focused = matches!(app.focus, Focus::Detail);
    let title = format!(" {} ", truncate_string(&reader.title, area.width.saturating_sub(4) as usize));

    let body = match reader.content {
        PageState::Ready(ref markdown) => markdown,
        _ => {
            ready_or_placeholder(frame, area, &reader.title, &reader.content);
            return;
        }
    };

    let (toc_area, body_area) = if reader.toc.is_empty() || area.width < TOC_WIDTH * 2 {
        (None, area)
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TOC_WIDTH), Constraint::Min(10)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    };

    if let Some(toc_area) = toc_area {
        let toc: Vec<Line> = reader
            .toc
            .iter()
            .map(|entry| {
                let indent = if entry.level > 2 { "  " } else { "" };
                Line::from(Span::styled(
                    format!("{}{}", indent, entry.text),
                    styles::list_item_style(),
                ))
            })
            .collect();
        let block = Block::default()
            .title(" Contents ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(toc).block(block), toc_area);
    }

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let mut lines = Vec::new();
    if let Some(article) = app.reader_article() {
        lines.push(Line::from(Span::styled(
            format!("{} · {} · {}", article.date, article.tag, article.read_time),
            styles::muted_style(),
        )));
        lines.push(Line::from(""));
    }
    lines.extend(markdown_lines(body));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((reader.scroll, 0));
    frame.render_widget(paragraph, body_area);
}

/// Light Markdown styling: headings, fenced code, list bullets and quotes
fn markdown_lines(markdown: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_fence = false;

    for raw in markdown.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            lines.push(Line::from(Span::styled(format!("  {}", raw), styles::muted_style())));
            continue;
        }

        let hashes = trimmed.chars().take_while(|&c| c == '#').count();
        if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
            let text = trimmed[hashes..].trim().to_string();
            let style = if hashes <= 2 {
                styles::title_style()
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(Span::styled(text, style)));
            continue;
        }

        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            lines.push(Line::from(vec![
                Span::styled("  • ", styles::highlight_style()),
                Span::raw(item.to_string()),
            ]));
        } else if let Some(quote) = trimmed.strip_prefix('>') {
            lines.push(Line::from(Span::styled(
                format!("│ {}", quote.trim_start()),
                styles::muted_style(),
            )));
        } else {
            lines.push(Line::from(raw.to_string()));
        }
    }

    lines
}
