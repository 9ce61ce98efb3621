use ratatui::style::{Color, Modifier, Style};

use quietspace_core::heatmap::MAX_LEVEL;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

/// Heatmap cell colors, level 0 to 4 (GitHub greens)
pub const HEAT_LEVELS: [Color; MAX_LEVEL as usize + 1] = [
    Color::Rgb(45, 51, 59),
    Color::Rgb(14, 68, 41),
    Color::Rgb(0, 109, 50),
    Color::Rgb(38, 166, 65),
    Color::Rgb(57, 211, 83),
];

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn heat_style(level: u8) -> Style {
    let index = (level.min(MAX_LEVEL)) as usize;
    Style::default().fg(HEAT_LEVELS[index])
}

pub fn today_style(level: u8) -> Style {
    heat_style(level).add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
}

/// Rating colors matching Codeforces rank tiers
pub fn rating_style(rating: Option<i64>) -> Style {
    let color = match rating {
        None => MUTED,
        Some(r) if r < 1200 => Color::Gray,
        Some(r) if r < 1400 => Color::Green,
        Some(r) if r < 1600 => Color::Cyan,
        Some(r) if r < 1900 => Color::Blue,
        Some(r) if r < 2100 => Color::Magenta,
        Some(r) if r < 2400 => Color::Yellow,
        Some(_) => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
