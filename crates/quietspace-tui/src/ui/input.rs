//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Focus, ProjectView, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            switch_tab(app, Tab::ALL[index]);
        }
        KeyCode::Left => {
            if app.current_tab == Tab::Projects && app.focus == Focus::Detail {
                app.project_view = app.project_view.prev();
                app.log_selection = 0;
            } else {
                switch_tab(app, app.current_tab.prev());
            }
        }
        KeyCode::Right => {
            if app.current_tab == Tab::Projects && app.focus == Focus::Detail {
                app.project_view = app.project_view.next();
                app.log_selection = 0;
            } else {
                switch_tab(app, app.current_tab.next());
            }
        }
        KeyCode::Char('r') => {
            // Pull-to-refresh: bypass the cache
            app.refresh_current_tab();
        }
        KeyCode::Char('/') => {
            if matches!(app.current_tab, Tab::Articles | Tab::Projects) {
                app.search_input = app.current_search().to_string();
                app.state = AppState::Searching;
            }
        }
        KeyCode::Char('x') => {
            app.reset_filters();
        }
        KeyCode::Tab => {
            // Toggle focus between list and detail panels
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Esc => {
            if app.current_tab == Tab::Articles && app.reader.is_some() {
                app.close_reader();
                app.focus = Focus::List;
            } else if app.focus == Focus::Detail {
                app.focus = Focus::List;
            } else {
                app.reset_filters();
            }
        }
        _ => match app.current_tab {
            Tab::Articles => handle_articles_input(app, key),
            Tab::Projects => handle_projects_input(app, key),
            Tab::Videos => {
                handle_list_navigation(app, key);
            }
            Tab::Codeforces => handle_codeforces_input(app, key),
        },
    }

    Ok(false)
}

fn switch_tab(app: &mut App, tab: Tab) {
    app.current_tab = tab;
    app.focus = Focus::List;
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_input.clear();
            app.apply_search();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.apply_search();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.apply_search();
        }
        _ => {}
    }
}

/// Up/down/page/home/end over the focused list. Returns true if handled.
fn handle_list_navigation(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.retry_current_tab(),
        _ => return false,
    }
    true
}

fn handle_articles_input(app: &mut App, key: KeyEvent) {
    // An open article takes the scroll keys
    if let Some(reader) = app.reader.as_mut() {
        if app.focus == Focus::Detail {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => reader.scroll = reader.scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => reader.scroll = reader.scroll.saturating_add(1),
                KeyCode::PageUp => reader.scroll = reader.scroll.saturating_sub(PAGE_SCROLL_SIZE as u16),
                KeyCode::PageDown => reader.scroll = reader.scroll.saturating_add(PAGE_SCROLL_SIZE as u16),
                KeyCode::Home | KeyCode::Char('g') => reader.scroll = 0,
                _ => {}
            }
            return;
        }
    }

    match key.code {
        KeyCode::Enter if app.articles.ready().is_some() => {
            app.open_selected_article();
            app.focus = Focus::Detail;
        }
        KeyCode::Char('c') => app.cycle_category(0),
        KeyCode::Char('s') => app.cycle_category(1),
        KeyCode::Char('l') => app.cycle_category(2),
        _ => {
            if handle_list_navigation(app, key) {
                app.close_reader();
            }
        }
    }
}

fn handle_projects_input(app: &mut App, key: KeyEvent) {
    if app.focus == Focus::Detail && app.project_view == ProjectView::Chart {
        let range = app.project_year_range();
        let calendar = &mut app.project_calendar;
        match key.code {
            KeyCode::Char('[') => calendar.cycle_month(false),
            KeyCode::Char(']') => calendar.cycle_month(true),
            KeyCode::Char('y') => calendar.step_year(false, range),
            KeyCode::Char('Y') => calendar.step_year(true, range),
            _ => {}
        }
        if matches!(key.code, KeyCode::Char('[' | ']' | 'y' | 'Y')) {
            return;
        }
    }

    match key.code {
        KeyCode::Char('c') => app.cycle_project_category(),
        KeyCode::Char('s') => app.cycle_project_status(),
        _ => {
            handle_list_navigation(app, key);
        }
    }
}

fn handle_codeforces_input(app: &mut App, key: KeyEvent) {
    let range = app.codeforces_year_range();
    match key.code {
        KeyCode::Char('[') => app.codeforces_calendar.cycle_month_wrapping(false),
        KeyCode::Char(']') => app.codeforces_calendar.cycle_month_wrapping(true),
        KeyCode::Char('y') => app.codeforces_calendar.step_year(false, range),
        KeyCode::Char('Y') => app.codeforces_calendar.step_year(true, range),
        KeyCode::Enter => app.retry_current_tab(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    use crate::app::test_app;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = test_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Articles);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_number_keys_select_tab() {
        let mut app = test_app();
        app.focus = Focus::Detail;
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.current_tab, Tab::Codeforces);
        assert_eq!(app.focus, Focus::List);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_tab, Tab::Articles);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_tab, Tab::Codeforces);
    }

    #[test]
    fn test_search_typing_updates_filter() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.article_filter.search, "rs");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.article_filter.search, "rs");

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.search_input, "rs");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert!(app.article_filter.search.is_empty());
    }

    #[test]
    fn test_search_not_offered_on_codeforces() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_project_detail_arrows_cycle_views() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Detail);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.current_tab, Tab::Projects);
        assert_eq!(app.project_view, ProjectView::Logs);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.project_view, ProjectView::Chart);

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.project_calendar.month, Some(1));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.project_calendar.month, None);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_codeforces_calendar_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('4'));
        app.codeforces_calendar.month = Some(1);
        let year = app.codeforces_calendar.year;

        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.codeforces_calendar.month, Some(12));

        press(&mut app, KeyCode::Char('Y'));
        assert_eq!(app.codeforces_calendar.year, year);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.codeforces_calendar.year, year - 1);
    }
}
