//! Per-tab content rendering.

pub mod articles;
pub mod codeforces;
pub mod projects;
pub mod videos;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use quietspace_core::loader::PageState;

use crate::ui::styles;

/// Render the loading or error placeholder for a page that is not ready.
/// Returns the loaded value otherwise.
pub fn ready_or_placeholder<'a, T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &'a PageState<T>,
) -> Option<&'a T> {
    let lines = match state {
        PageState::Ready(value) => return Some(value),
        PageState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled("Loading...", styles::muted_style())),
        ],
        PageState::Failed { message, retryable } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled("Failed to load", styles::error_style())),
                Line::from(""),
                Line::from(Span::styled(message.clone(), styles::muted_style())),
            ];
            if *retryable {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("[Enter]", styles::help_key_style()),
                    Span::styled(" retry", styles::muted_style()),
                ]));
            }
            lines
        }
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
    None
}

/// Word-wrap plain text to `max_width` columns
pub fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// A "Label: value" line with a muted label
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", format!("{}:", label)), styles::muted_style()),
        Span::raw(value.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_text_long_word() {
        let lines = wrap_text("supercalifragilistic ok", 5);
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert!(wrap_text("   ", 10).is_empty());
    }
}
