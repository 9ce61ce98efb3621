//! Application state management for quietspace.
//!
//! `App` owns the loaded datasets, one `PageState` per page, the list and
//! filter state of every tab, and the channel that background loads report
//! back on.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use quietspace_core::api::{CodeforcesClient, LoadError};
use quietspace_core::heatmap::{build_grid, GridOptions, HeatmapGrid, LevelPolicy};
use quietspace_core::loader::{CachedResourceLoader, Dataset, Origin, PageState, ResourceKey};
use quietspace_core::models::project::{chart_year_options, development_logs, distinct_values, log_dates};
use quietspace_core::models::{
    find_article, Article, ArticleFilter, CategoryTree, CodeforcesProfile, Project, ProjectFilter, Video,
};
use quietspace_core::utils::{extract_toc, TocEntry};
use quietspace_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// At most one load per page plus an article body is in flight at a time.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Years offered by the Codeforces submission calendar, ending with the current one
const CODEFORCES_CALENDAR_YEARS: i32 = 5;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Articles,
    Projects,
    Videos,
    Codeforces,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Articles, Tab::Projects, Tab::Videos, Tab::Codeforces];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Articles => "Articles",
            Tab::Projects => "Projects",
            Tab::Videos => "Videos",
            Tab::Codeforces => "Codeforces",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Articles => Tab::Projects,
            Tab::Projects => Tab::Videos,
            Tab::Videos => Tab::Codeforces,
            Tab::Codeforces => Tab::Articles,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Articles => Tab::Codeforces,
            Tab::Projects => Tab::Articles,
            Tab::Videos => Tab::Projects,
            Tab::Codeforces => Tab::Videos,
        }
    }

    /// Dataset shown by this tab; the Codeforces tab has its own client
    pub fn resource(&self) -> Option<ResourceKey> {
        match self {
            Tab::Articles => Some(ResourceKey::Articles),
            Tab::Projects => Some(ResourceKey::Projects),
            Tab::Videos => Some(ResourceKey::Videos),
            Tab::Codeforces => None,
        }
    }
}

/// Sub-view for the project detail panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectView {
    Overview,
    Logs,
    Chart,
}

impl ProjectView {
    pub fn next(&self) -> Self {
        match self {
            ProjectView::Overview => ProjectView::Logs,
            ProjectView::Logs => ProjectView::Chart,
            ProjectView::Chart => ProjectView::Overview,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ProjectView::Overview => ProjectView::Chart,
            ProjectView::Logs => ProjectView::Overview,
            ProjectView::Chart => ProjectView::Logs,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Year and optional month shown by a calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSelection {
    pub year: i32,
    pub month: Option<u32>,
}

impl CalendarSelection {
    /// Step the month through `None` (whole year) and 1..=12
    pub fn cycle_month(&mut self, forward: bool) {
        self.month = match (self.month, forward) {
            (None, true) => Some(1),
            (None, false) => Some(12),
            (Some(12), true) | (Some(1), false) => None,
            (Some(m), true) => Some(m + 1),
            (Some(m), false) => Some(m - 1),
        };
    }

    /// Step the month within 1..=12, wrapping
    pub fn cycle_month_wrapping(&mut self, forward: bool) {
        let m = self.month.unwrap_or(1);
        self.month = Some(match (m, forward) {
            (12, true) => 1,
            (1, false) => 12,
            (m, true) => m + 1,
            (m, false) => m - 1,
        });
    }

    /// Move the year one step within `range`, staying put at either end
    pub fn step_year(&mut self, forward: bool, range: std::ops::RangeInclusive<i32>) {
        let next = if forward { self.year + 1 } else { self.year - 1 };
        if range.contains(&next) {
            self.year = next;
        }
    }
}

/// Markdown body of the article being read
#[derive(Debug, Clone)]
pub struct ArticleReader {
    pub article_id: String,
    pub title: String,
    pub content: PageState<String>,
    pub toc: Vec<TocEntry>,
    pub scroll: u16,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background load tasks back to the UI loop.
enum RefreshResult {
    Articles(Result<Dataset<Article>, LoadError>),
    Projects(Result<Dataset<Project>, LoadError>),
    Videos(Result<Dataset<Video>, LoadError>),
    Codeforces(Result<CodeforcesProfile, LoadError>),
    /// Markdown body for an article (article_id, body)
    Markdown(String, Result<String, LoadError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    loader: CachedResourceLoader,
    codeforces: CodeforcesClient,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    /// Search text being typed while `AppState::Searching`
    pub search_input: String,
    pub project_view: ProjectView,

    // Page data
    pub articles: PageState<Dataset<Article>>,
    pub projects: PageState<Dataset<Project>>,
    pub videos: PageState<Dataset<Video>>,
    pub codeforces_profile: PageState<CodeforcesProfile>,
    pub category_tree: CategoryTree,
    pub reader: Option<ArticleReader>,

    // Filters
    pub article_filter: ArticleFilter,
    pub project_filter: ProjectFilter,

    // Selection indices
    pub article_selection: usize,
    pub project_selection: usize,
    pub video_selection: usize,
    pub log_selection: usize,

    // Calendars
    pub project_calendar: CalendarSelection,
    pub codeforces_calendar: CalendarSelection,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let loader = CachedResourceLoader::from_config(&config)?;
        Self::with_loader(config, loader)
    }

    /// Build the app around an already configured loader
    pub fn with_loader(config: Config, loader: CachedResourceLoader) -> Result<Self> {
        let codeforces = CodeforcesClient::new(&config.codeforces_handle, config.request_timeout_secs)
            .context("Failed to create Codeforces client")?;
        debug!(handle = %config.codeforces_handle, api = %config.api_base_url, "App configured");

        let today = today();
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            loader,
            codeforces,
            state: AppState::Normal,
            current_tab: Tab::Articles,
            focus: Focus::List,
            search_input: String::new(),
            project_view: ProjectView::Overview,
            articles: PageState::Loading,
            projects: PageState::Loading,
            videos: PageState::Loading,
            codeforces_profile: PageState::Loading,
            category_tree: CategoryTree::default(),
            reader: None,
            article_filter: ArticleFilter::default(),
            project_filter: ProjectFilter::default(),
            article_selection: 0,
            project_selection: 0,
            video_selection: 0,
            log_selection: 0,
            project_calendar: CalendarSelection {
                year: today.year(),
                month: None,
            },
            codeforces_calendar: CalendarSelection {
                year: today.year(),
                month: Some(today.month()),
            },
            refresh_rx: rx,
            refresh_tx: tx,
            status_message: None,
        })
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Start loading every page. Cached datasets come back almost at once.
    pub fn load_all(&mut self, force_refresh: bool) {
        for tab in Tab::ALL {
            self.load_tab(tab, force_refresh);
        }
    }

    /// Reload the current tab bypassing the cache
    pub fn refresh_current_tab(&mut self) {
        info!(tab = self.current_tab.title(), "Manual refresh");
        self.status_message = Some(format!("Refreshing {}...", self.current_tab.title()));
        self.load_tab(self.current_tab, true);
    }

    /// Retry the current tab after a failure, honoring the cache
    pub fn retry_current_tab(&mut self) {
        let retryable = match self.current_tab {
            Tab::Articles => is_retryable(&self.articles),
            Tab::Projects => is_retryable(&self.projects),
            Tab::Videos => is_retryable(&self.videos),
            Tab::Codeforces => is_retryable(&self.codeforces_profile),
        };
        if retryable {
            self.load_tab(self.current_tab, false);
        }
    }

    fn load_tab(&mut self, tab: Tab, force_refresh: bool) {
        let tx = self.refresh_tx.clone();

        match tab {
            Tab::Articles => {
                self.articles = PageState::Loading;
                let loader = self.loader.clone();
                tokio::spawn(async move {
                    let result = loader.load_articles(force_refresh).await;
                    Self::send_result(&tx, RefreshResult::Articles(result)).await;
                });
            }
            Tab::Projects => {
                self.projects = PageState::Loading;
                let loader = self.loader.clone();
                tokio::spawn(async move {
                    let result = loader.load_projects(force_refresh).await;
                    Self::send_result(&tx, RefreshResult::Projects(result)).await;
                });
            }
            Tab::Videos => {
                self.videos = PageState::Loading;
                let loader = self.loader.clone();
                tokio::spawn(async move {
                    let result = loader.load_videos(force_refresh).await;
                    Self::send_result(&tx, RefreshResult::Videos(result)).await;
                });
            }
            Tab::Codeforces => {
                self.codeforces_profile = PageState::Loading;
                let client = self.codeforces.clone();
                tokio::spawn(async move {
                    let result = client.fetch_profile().await;
                    Self::send_result(&tx, RefreshResult::Codeforces(result)).await;
                });
            }
        }
    }

    /// Fetch the Markdown body of the selected article
    pub fn open_selected_article(&mut self) {
        let Some(article) = self.selected_article() else {
            return;
        };
        let article_id = article.id.clone();
        let title = article.title.clone();

        if self.reader.as_ref().is_some_and(|r| r.article_id == article_id && r.content.ready().is_some()) {
            return;
        }

        self.reader = Some(ArticleReader {
            article_id: article_id.clone(),
            title: title.clone(),
            content: PageState::Loading,
            toc: Vec::new(),
            scroll: 0,
        });

        let tx = self.refresh_tx.clone();
        let loader = self.loader.clone();
        tokio::spawn(async move {
            let result = loader.fetch_markdown(&title).await;
            Self::send_result(&tx, RefreshResult::Markdown(article_id, result)).await;
        });
    }

    /// The article shown in the reader, looked up by id in the loaded list
    pub fn reader_article(&self) -> Option<&Article> {
        let reader = self.reader.as_ref()?;
        let dataset = self.articles.ready()?;
        find_article(&dataset.items, &reader.article_id)
    }

    pub fn close_reader(&mut self) {
        self.reader = None;
    }

    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Apply every result the background tasks have produced so far
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.refresh_rx.try_recv() {
            self.process_refresh_result(result);
        }
    }

    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Articles(result) => {
                if let Ok(ref dataset) = result {
                    self.category_tree = CategoryTree::from_articles(&dataset.items);
                    self.note_loaded("articles", dataset.items.len(), dataset.origin);
                    // The open article may be gone after a refresh
                    if let Some(ref reader) = self.reader {
                        if find_article(&dataset.items, &reader.article_id).is_none() {
                            debug!(article = %reader.article_id, "Closing reader for removed article");
                            self.reader = None;
                        }
                    }
                }
                self.articles = self.page_state(result, "Articles");
                self.article_selection = 0;
            }
            RefreshResult::Projects(result) => {
                if let Ok(ref dataset) = result {
                    self.note_loaded("projects", dataset.items.len(), dataset.origin);
                }
                self.projects = self.page_state(result, "Projects");
                self.project_selection = 0;
                self.reset_project_detail();
            }
            RefreshResult::Videos(result) => {
                if let Ok(ref dataset) = result {
                    self.note_loaded("videos", dataset.items.len(), dataset.origin);
                }
                self.videos = self.page_state(result, "Videos");
                self.video_selection = 0;
            }
            RefreshResult::Codeforces(result) => {
                if let Ok(ref profile) = result {
                    self.status_message = Some(format!(
                        "Loaded Codeforces profile {} ({} submissions)",
                        profile.user.handle,
                        profile.submissions.len()
                    ));
                }
                self.codeforces_profile = self.page_state(result, "Codeforces");
            }
            RefreshResult::Markdown(article_id, result) => {
                // Ignore bodies for an article the user has already left
                let Some(reader) = self.reader.as_mut().filter(|r| r.article_id == article_id) else {
                    debug!(article = %article_id, "Discarding markdown for closed article");
                    return;
                };
                if let Ok(ref body) = result {
                    reader.toc = extract_toc(body);
                }
                if let Err(ref e) = result {
                    warn!(article = %article_id, error = %e, "Failed to load article body");
                }
                reader.content = PageState::from_result(result);
            }
        }
    }

    fn page_state<T>(&mut self, result: Result<T, LoadError>, page: &str) -> PageState<T> {
        if let Err(ref e) = result {
            warn!(page = page, error = %e, "Load failed");
            self.status_message = Some(format!("{} failed to load", page));
        }
        PageState::from_result(result)
    }

    fn note_loaded(&mut self, what: &str, count: usize, origin: Origin) {
        let source = match origin {
            Origin::Cache => "cache",
            Origin::Network => "network",
        };
        self.status_message = Some(format!("Loaded {} {} from {}", count, what, source));
    }

    /// Age of the cached copy behind the current tab
    pub fn cache_age(&self) -> Option<String> {
        self.current_tab.resource().and_then(|key| self.loader.cache_age(key))
    }

    // ------------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------------

    pub fn filtered_articles(&self) -> Vec<&Article> {
        match self.articles.ready() {
            Some(dataset) => self.article_filter.apply(&dataset.items),
            None => Vec::new(),
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.filtered_articles().get(self.article_selection).copied()
    }

    /// Move the category selection at `level` (0..=2) to the next option,
    /// passing through "all" after the last one
    pub fn cycle_category(&mut self, level: usize) {
        let filter = &self.article_filter;
        let options: Vec<String> = match level {
            0 => self.category_tree.level1().to_vec(),
            1 => match filter.level1() {
                Some(l1) => self.category_tree.level2(l1).to_vec(),
                None => Vec::new(),
            },
            _ => match (filter.level1(), filter.level2()) {
                (Some(l1), Some(l2)) => self.category_tree.level3(l1, l2).to_vec(),
                _ => Vec::new(),
            },
        };
        if options.is_empty() {
            return;
        }

        let current = match level {
            0 => filter.level1(),
            1 => filter.level2(),
            _ => filter.level3(),
        };
        let next = next_option(&options, current);

        match level {
            0 => self.article_filter.set_level1(next),
            1 => self.article_filter.set_level2(next),
            _ => self.article_filter.set_level3(next),
        }
        self.article_selection = 0;
    }

    // ------------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------------

    pub fn filtered_projects(&self) -> Vec<&Project> {
        match self.projects.ready() {
            Some(dataset) => self.project_filter.apply(&dataset.items),
            None => Vec::new(),
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.filtered_projects().get(self.project_selection).copied()
    }

    pub fn cycle_project_category(&mut self) {
        if let Some(dataset) = self.projects.ready() {
            let options = distinct_values(&dataset.items, |p| p.category.as_str());
            self.project_filter.category = next_option(&options, self.project_filter.category.as_deref());
            self.project_selection = 0;
            self.reset_project_detail();
        }
    }

    pub fn cycle_project_status(&mut self) {
        if let Some(dataset) = self.projects.ready() {
            let options = distinct_values(&dataset.items, |p| p.status.as_str());
            self.project_filter.status = next_option(&options, self.project_filter.status.as_deref());
            self.project_selection = 0;
            self.reset_project_detail();
        }
    }

    /// Development logs of the selected project, newest first
    pub fn selected_project_logs(&self) -> Vec<&Article> {
        match (self.selected_project(), self.articles.ready()) {
            (Some(project), Some(articles)) => development_logs(project, &articles.items),
            _ => Vec::new(),
        }
    }

    /// Point the chart and log list at the selected project
    pub fn reset_project_detail(&mut self) {
        let today = today();
        let year = self
            .selected_project()
            .map(|p| p.chart_year(today))
            .unwrap_or_else(|| today.year());
        self.project_calendar = CalendarSelection { year, month: None };
        self.log_selection = 0;
    }

    /// Years the project chart may show
    pub fn project_year_range(&self) -> std::ops::RangeInclusive<i32> {
        let today = today();
        let year = self
            .selected_project()
            .map(|p| p.chart_year(today))
            .unwrap_or_else(|| today.year());
        chart_year_options(year)
    }

    /// Contribution chart of the selected project's development logs
    pub fn project_grid(&self) -> Option<HeatmapGrid> {
        let logs = self.selected_project_logs();
        let options = GridOptions::new(LevelPolicy::Clip)
            .first_weekday(Weekday::Mon)
            .today(today());
        let selection = self.project_calendar;
        match build_grid(log_dates(&logs), selection.year, selection.month, &options) {
            Ok(grid) => Some(grid),
            Err(e) => {
                warn!(error = %e, "Failed to build project chart");
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Videos
    // ------------------------------------------------------------------------

    pub fn video_list(&self) -> &[Video] {
        match self.videos.ready() {
            Some(dataset) => &dataset.items,
            None => &[],
        }
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.video_list().get(self.video_selection)
    }

    // ------------------------------------------------------------------------
    // Codeforces
    // ------------------------------------------------------------------------

    pub fn codeforces_year_range(&self) -> std::ops::RangeInclusive<i32> {
        let year = today().year();
        (year - CODEFORCES_CALENDAR_YEARS + 1)..=year
    }

    /// Monthly submission calendar
    pub fn codeforces_grid(&self) -> Option<HeatmapGrid> {
        let profile = self.codeforces_profile.ready()?;
        let options = GridOptions::new(LevelPolicy::RelativeQuantile).today(today());
        let selection = self.codeforces_calendar;
        match build_grid(profile.submission_dates(), selection.year, selection.month, &options) {
            Ok(grid) => Some(grid),
            Err(e) => {
                warn!(error = %e, "Failed to build submission calendar");
                None
            }
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Number of rows in the list that currently has focus
    pub fn current_list_len(&self) -> usize {
        match (self.current_tab, self.focus) {
            (Tab::Articles, _) => self.filtered_articles().len(),
            (Tab::Projects, Focus::Detail) if self.project_view == ProjectView::Logs => {
                self.selected_project_logs().len()
            }
            (Tab::Projects, _) => self.filtered_projects().len(),
            (Tab::Videos, _) => self.video_list().len(),
            (Tab::Codeforces, _) => 0,
        }
    }

    fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match (self.current_tab, self.focus) {
            (Tab::Articles, _) => Some(&mut self.article_selection),
            (Tab::Projects, Focus::Detail) if self.project_view == ProjectView::Logs => {
                Some(&mut self.log_selection)
            }
            (Tab::Projects, _) => Some(&mut self.project_selection),
            (Tab::Videos, _) => Some(&mut self.video_selection),
            (Tab::Codeforces, _) => None,
        }
    }

    /// Move the current selection by `delta` rows, clamped to the list
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_list_len();
        let project_list = self.current_tab == Tab::Projects && self.focus == Focus::List;
        let Some(selection) = self.current_selection_mut() else {
            return;
        };
        if len == 0 {
            *selection = 0;
            return;
        }

        let before = *selection;
        let target = (*selection as isize + delta).clamp(0, len as isize - 1);
        *selection = target as usize;

        if project_list && before != *selection {
            self.reset_project_detail();
        }
    }

    pub fn select_first(&mut self) {
        self.move_selection(isize::MIN / 2);
    }

    pub fn select_last(&mut self) {
        self.move_selection(isize::MAX / 2);
    }

    /// Commit the search box to the current tab's filter
    pub fn apply_search(&mut self) {
        let query = self.search_input.trim().to_string();
        match self.current_tab {
            Tab::Articles => {
                self.article_filter.search = query;
                self.article_selection = 0;
            }
            Tab::Projects => {
                self.project_filter.search = query;
                self.project_selection = 0;
                self.reset_project_detail();
            }
            Tab::Videos | Tab::Codeforces => {}
        }
    }

    pub fn reset_filters(&mut self) {
        match self.current_tab {
            Tab::Articles => {
                self.article_filter.reset();
                self.article_selection = 0;
            }
            Tab::Projects => {
                self.project_filter.reset();
                self.project_selection = 0;
                self.reset_project_detail();
            }
            Tab::Videos | Tab::Codeforces => {}
        }
        self.search_input.clear();
    }

    /// Search text of the current tab's filter
    pub fn current_search(&self) -> &str {
        match self.current_tab {
            Tab::Articles => &self.article_filter.search,
            Tab::Projects => &self.project_filter.search,
            Tab::Videos | Tab::Codeforces => "",
        }
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_retryable<T>(state: &PageState<T>) -> bool {
    matches!(state, PageState::Failed { retryable: true, .. })
}

/// Next option after `current`; after the last option comes `None` ("all")
fn next_option(options: &[String], current: Option<&str>) -> Option<String> {
    match current {
        None => options.first().cloned(),
        Some(current) => match options.iter().position(|o| o == current) {
            Some(i) => options.get(i + 1).cloned(),
            None => options.first().cloned(),
        },
    }
}

/// App over an in-memory cache and an unreachable backend
#[cfg(test)]
pub(crate) fn test_app() -> App {
    use quietspace_core::cache::{MemoryCacheStore, SystemClock};
    use quietspace_core::{ApiClient, CacheManager};
    use std::sync::Arc;

    let api = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
    let cache = CacheManager::new(Arc::new(MemoryCacheStore::new()), Arc::new(SystemClock));
    App::with_loader(Config::default(), CachedResourceLoader::new(api, cache)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quietspace_core::models::{ArticleRecord, RecordId};

    fn articles(ids: &[&str]) -> Dataset<Article> {
        Dataset {
            items: ids
                .iter()
                .map(|id| {
                    Article::from(ArticleRecord {
                        id: Some(RecordId::Text(id.to_string())),
                        title: Some(format!("Article {}", id)),
                        ..Default::default()
                    })
                })
                .collect(),
            origin: Origin::Cache,
            fetched_at: Utc::now(),
            skipped: 0,
        }
    }

    fn open_reader(app: &mut App, id: &str) {
        app.reader = Some(ArticleReader {
            article_id: id.to_string(),
            title: format!("Article {}", id),
            content: PageState::Ready("## Intro".to_string()),
            toc: Vec::new(),
            scroll: 0,
        });
    }

    #[test]
    fn test_project_month_chart_starts_on_monday() {
        let mut app = test_app();
        app.project_calendar = CalendarSelection { year: 2024, month: Some(3) };
        let grid = app.project_grid().unwrap();
        assert_eq!(grid.weeks[0][0].date().weekday(), Weekday::Mon);
        // March 2024 starts on a Friday: Mon 26 Feb is the first slot
        assert_eq!(grid.weeks[0][0].date(), NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
    }

    #[test]
    fn test_reader_article_lookup() {
        let mut app = test_app();
        app.process_refresh_result(RefreshResult::Articles(Ok(articles(&["a", "b"]))));
        open_reader(&mut app, "b");
        assert_eq!(app.reader_article().map(|a| a.title.as_str()), Some("Article b"));
    }

    #[test]
    fn test_reload_closes_reader_for_removed_article() {
        let mut app = test_app();
        app.process_refresh_result(RefreshResult::Articles(Ok(articles(&["a", "b"]))));
        open_reader(&mut app, "b");

        app.process_refresh_result(RefreshResult::Articles(Ok(articles(&["b", "c"]))));
        assert!(app.reader.is_some());

        app.process_refresh_result(RefreshResult::Articles(Ok(articles(&["c"]))));
        assert!(app.reader.is_none());
    }

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Articles.next(), Tab::Projects);
        assert_eq!(Tab::Codeforces.next(), Tab::Articles);
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Articles.prev(), Tab::Codeforces);
        assert_eq!(Tab::Videos.prev(), Tab::Projects);
    }

    #[test]
    fn test_tab_resource() {
        assert_eq!(Tab::Videos.resource(), Some(ResourceKey::Videos));
        assert_eq!(Tab::Codeforces.resource(), None);
    }

    #[test]
    fn test_project_view_cycle() {
        assert_eq!(ProjectView::Overview.next(), ProjectView::Logs);
        assert_eq!(ProjectView::Overview.prev(), ProjectView::Chart);
    }

    #[test]
    fn test_next_option() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(next_option(&options, None).as_deref(), Some("a"));
        assert_eq!(next_option(&options, Some("a")).as_deref(), Some("b"));
        assert_eq!(next_option(&options, Some("b")), None);
        assert_eq!(next_option(&options, Some("gone")).as_deref(), Some("a"));
        assert_eq!(next_option(&[], None), None);
    }

    #[test]
    fn test_calendar_month_cycle() {
        let mut selection = CalendarSelection { year: 2024, month: None };
        selection.cycle_month(true);
        assert_eq!(selection.month, Some(1));
        selection.cycle_month(false);
        assert_eq!(selection.month, None);
        selection.cycle_month(false);
        assert_eq!(selection.month, Some(12));
        selection.cycle_month(true);
        assert_eq!(selection.month, None);

        let mut selection = CalendarSelection { year: 2024, month: Some(12) };
        selection.cycle_month_wrapping(true);
        assert_eq!(selection.month, Some(1));
        selection.cycle_month_wrapping(false);
        assert_eq!(selection.month, Some(12));
    }

    #[test]
    fn test_calendar_year_range() {
        let mut selection = CalendarSelection { year: 2024, month: None };
        selection.step_year(true, 2023..=2025);
        assert_eq!(selection.year, 2025);
        selection.step_year(true, 2023..=2025);
        assert_eq!(selection.year, 2025);
        selection.step_year(false, 2023..=2025);
        selection.step_year(false, 2023..=2025);
        selection.step_year(false, 2023..=2025);
        assert_eq!(selection.year, 2023);
    }
}
