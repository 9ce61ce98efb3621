use std::ops::RangeInclusive;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::article::{id_string, Article, RecordId};
use super::{loose_id, loose_string, non_empty, or_default, string_list};
use crate::utils::format::{contains_ignore_case, parse_record_date};

pub const DEFAULT_TITLE: &str = "Untitled project";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_STATUS: &str = "Unknown status";
pub const DEFAULT_DATE: &str = "Unknown date";
pub const DEFAULT_DURATION: &str = "Unknown duration";
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Title used for the placeholder image
pub const DEFAULT_IMAGE_TITLE: &str = "默认图片";

/// Project as stored in `projects.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub image: Option<String>,
    pub images: Option<Value>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(rename = "techStack")]
    pub tech_stack: Option<Value>,
    pub features: Option<Value>,
    #[serde(default, deserialize_with = "loose_string")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub challenges: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Projects,
    Articles,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Projects => "projects",
            ImageKind::Articles => "articles",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "projects" => Some(ImageKind::Projects),
            "articles" => Some(ImageKind::Articles),
            _ => None,
        }
    }
}

/// Image served by the backend's image API, parsed from a
/// `/images/<kind>/<id>/<title>.webp` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub kind: ImageKind,
    pub id: String,
    pub title: String,
}

impl ImageRef {
    /// Placeholder dated `YYYYMMDD01` for `today`
    pub fn placeholder(today: NaiveDate) -> Self {
        Self {
            kind: ImageKind::Projects,
            id: format!("{}01", today.format("%Y%m%d")),
            title: DEFAULT_IMAGE_TITLE.to_string(),
        }
    }

    /// Parse an image path, returning `None` for anything malformed
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/images/")?;
        let mut parts = rest.splitn(3, '/');
        let kind = ImageKind::parse(parts.next()?)?;
        let id = parts.next()?;
        let file = parts.next()?;
        if id.is_empty() {
            return None;
        }

        // Titles may themselves contain '/'
        let title = match file.len().checked_sub(5) {
            Some(cut) if file.is_char_boundary(cut) && file[cut..].eq_ignore_ascii_case(".webp") => &file[..cut],
            _ => file,
        };

        Some(Self {
            kind,
            id: id.to_string(),
            title: title.to_string(),
        })
    }

    pub fn parse_or_placeholder(path: Option<&str>, today: NaiveDate) -> Self {
        match path.and_then(Self::parse) {
            Some(image) => image,
            None => {
                if let Some(path) = path {
                    tracing::warn!(path, "Unrecognized image path, using placeholder");
                }
                Self::placeholder(today)
            }
        }
    }

    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}/api/images/{}/{}?title={}",
            api_base.trim_end_matches('/'),
            self.kind.as_str(),
            self.id,
            urlencoding::encode(&self.title)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: String,
    /// Links the project to its development log articles; may be empty
    pub tag: String,
    pub date: String,
    pub duration: String,
    pub image: ImageRef,
    pub images: Vec<String>,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub features: Vec<String>,
    pub github: Option<String>,
    pub link: Option<String>,
    pub challenges: Option<String>,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self::from_record(record, Local::now().date_naive())
    }
}

impl Project {
    /// Normalize a wire record; `today` dates the placeholder image
    pub fn from_record(record: ProjectRecord, today: NaiveDate) -> Self {
        let image = ImageRef::parse_or_placeholder(record.image.as_deref(), today);
        let id = id_string(record.id).unwrap_or_else(|| image.id.clone());

        Self {
            id,
            title: or_default(record.title, DEFAULT_TITLE),
            category: or_default(record.category, DEFAULT_CATEGORY),
            status: or_default(record.status, DEFAULT_STATUS),
            tag: non_empty(record.tag).unwrap_or_default(),
            date: or_default(record.date, DEFAULT_DATE),
            duration: or_default(record.duration, DEFAULT_DURATION),
            image,
            images: string_list(record.images),
            description: or_default(record.description, DEFAULT_DESCRIPTION),
            tech_stack: string_list(record.tech_stack),
            features: string_list(record.features),
            github: non_empty(record.github),
            link: non_empty(record.link),
            challenges: non_empty(record.challenges),
        }
    }

    pub fn started_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }

    /// Gallery image URLs: parsed image paths go through the image API,
    /// anything else is shown as given
    pub fn gallery_urls(&self, api_base: &str) -> Vec<String> {
        self.images
            .iter()
            .map(|path| match ImageRef::parse(path) {
                Some(image) => image.api_url(api_base),
                None => path.clone(),
            })
            .collect()
    }

    /// Year the contribution chart opens on: the project's own year, or the
    /// current one when the date is unknown
    pub fn chart_year(&self, today: NaiveDate) -> i32 {
        self.started_on().unwrap_or(today).year()
    }
}

/// Years offered by the contribution chart around `year`
pub fn chart_year_options(year: i32) -> RangeInclusive<i32> {
    (year - 1)..=(year + 1)
}

/// Articles whose tag equals the project tag (case-insensitive), newest first.
/// Articles without a parseable date sort last.
pub fn development_logs<'a>(project: &Project, articles: &'a [Article]) -> Vec<&'a Article> {
    let tag = project.tag.trim();
    if tag.is_empty() {
        return Vec::new();
    }

    let tag = tag.to_lowercase();
    let mut logs: Vec<&Article> = articles
        .iter()
        .filter(|a| a.tag.trim().to_lowercase() == tag)
        .collect();
    logs.sort_by(|a, b| b.published_on().cmp(&a.published_on()));
    logs
}

/// Days the development logs were published, for the contribution chart
pub fn log_dates(logs: &[&Article]) -> Vec<NaiveDate> {
    logs.iter().filter_map(|a| a.published_on()).collect()
}

/// Search term plus category and status selection for the project list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub search: String,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ProjectFilter {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some() || self.status.is_some()
    }

    pub fn matches(&self, project: &Project) -> bool {
        if self.category.as_deref().is_some_and(|c| c != project.category) {
            return false;
        }
        if self.status.as_deref().is_some_and(|s| s != project.status) {
            return false;
        }

        let term = self.search.trim();
        term.is_empty()
            || contains_ignore_case(&project.title, term)
            || contains_ignore_case(&project.description, term)
            || contains_ignore_case(&project.tag, term)
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct values of one project field in first-seen order, for filter pickers
pub fn distinct_values<F>(projects: &[Project], field: F) -> Vec<String>
where
    F: Fn(&Project) -> &str,
{
    let mut values: Vec<String> = Vec::new();
    for project in projects {
        let value = field(project);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
    }

    fn project(value: Value) -> Project {
        Project::from_record(serde_json::from_value(value).unwrap(), today())
    }

    fn article(value: Value) -> Article {
        serde_json::from_value::<ArticleRecord>(value).unwrap().into()
    }

    #[test]
    fn test_image_path_parsing() {
        let image = ImageRef::parse("/images/projects/2024030501/Cover Shot.webp").unwrap();
        assert_eq!(image.kind, ImageKind::Projects);
        assert_eq!(image.id, "2024030501");
        assert_eq!(image.title, "Cover Shot");
        assert_eq!(
            image.api_url("https://api.example.com/"),
            "https://api.example.com/api/images/projects/2024030501?title=Cover%20Shot"
        );

        let nested = ImageRef::parse("/images/articles/7/a/b.WEBP").unwrap();
        assert_eq!(nested.kind, ImageKind::Articles);
        assert_eq!(nested.title, "a/b");

        assert!(ImageRef::parse("/images/videos/1/x.webp").is_none());
        assert!(ImageRef::parse("/images/projects/1").is_none());
        assert!(ImageRef::parse("images/projects/1/x.webp").is_none());
    }

    #[test]
    fn test_image_placeholder() {
        let image = ImageRef::parse_or_placeholder(Some("/static/x.png"), today());
        assert_eq!(image, ImageRef::placeholder(today()));
        assert_eq!(image.id, "2025060901");
        assert_eq!(image.title, DEFAULT_IMAGE_TITLE);
        assert_eq!(ImageRef::parse_or_placeholder(None, today()).id, "2025060901");
    }

    #[test]
    fn test_normalize_defaults() {
        let p = project(json!({ "techStack": "Rust", "features": null }));
        assert_eq!(p.title, DEFAULT_TITLE);
        assert_eq!(p.category, DEFAULT_CATEGORY);
        assert_eq!(p.status, DEFAULT_STATUS);
        assert_eq!(p.date, DEFAULT_DATE);
        assert_eq!(p.duration, DEFAULT_DURATION);
        assert_eq!(p.description, DEFAULT_DESCRIPTION);
        assert_eq!(p.tag, "");
        assert!(p.tech_stack.is_empty());
        assert!(p.features.is_empty());
        assert!(p.github.is_none());
        // Id falls back to the image id
        assert_eq!(p.id, "2025060901");
    }

    #[test]
    fn test_normalize_fields() {
        let p = project(json!({
            "id": 42,
            "title": "quietspace",
            "tag": "quietspace",
            "date": "2024-05-01",
            "image": "/images/projects/2024050101/cover.webp",
            "techStack": ["Rust", 3, "tokio"],
            "github": "https://github.com/peacerocket/quietspace"
        }));
        assert_eq!(p.id, "42");
        assert_eq!(p.tech_stack, ["Rust", "tokio"]);
        assert_eq!(p.image.id, "2024050101");
        assert_eq!(p.chart_year(today()), 2024);
        assert_eq!(chart_year_options(2024).collect::<Vec<_>>(), [2023, 2024, 2025]);
    }

    #[test]
    fn test_gallery_urls() {
        let p = project(json!({
            "images": [
                "/images/projects/2024050101/step one.webp",
                "https://cdn.example.com/shot.png",
                7
            ]
        }));
        assert_eq!(
            p.gallery_urls("https://api.example.com"),
            [
                "https://api.example.com/api/images/projects/2024050101?title=step%20one",
                "https://cdn.example.com/shot.png",
            ]
        );
        assert!(project(json!({})).gallery_urls("https://api.example.com").is_empty());
    }

    #[test]
    fn test_chart_year_without_date() {
        assert_eq!(project(json!({})).chart_year(today()), 2025);
    }

    #[test]
    fn test_development_logs() {
        let p = project(json!({ "id": 1, "tag": "QuietSpace" }));
        let articles = vec![
            article(json!({ "id": "a", "tag": "quietspace", "date": "2024-03-01" })),
            article(json!({ "id": "b", "tag": "Rust", "date": "2024-03-02" })),
            article(json!({ "id": "c", "tag": "QUIETSPACE", "date": "2024-04-10" })),
            article(json!({ "id": "d", "tag": "quietspace" })),
            article(json!({ "id": "e", "tag": "quietspace-extra", "date": "2024-05-01" })),
        ];

        let logs = development_logs(&p, &articles);
        let ids: Vec<_> = logs.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "d"]);

        let dates = log_dates(&logs);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    }

    #[test]
    fn test_development_logs_empty_tag() {
        let p = project(json!({ "id": 1 }));
        let articles = vec![article(json!({ "id": "a" }))];
        assert!(development_logs(&p, &articles).is_empty());
    }

    #[test]
    fn test_project_filter() {
        let projects = vec![
            project(json!({ "id": 1, "title": "Heatmap", "category": "Tools", "status": "Done" })),
            project(json!({ "id": 2, "title": "Blog", "description": "A heatmap inside", "category": "Web", "status": "Active" })),
            project(json!({ "id": 3, "title": "Game", "tag": "HEATMAP", "category": "Tools", "status": "Active" })),
        ];

        let mut filter = ProjectFilter {
            search: "heatmap".into(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&projects).len(), 3);

        filter.category = Some("Tools".into());
        assert_eq!(filter.apply(&projects).len(), 2);

        filter.status = Some("Active".into());
        let matched = filter.apply(&projects);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "3");

        filter.reset();
        assert!(!filter.is_active());
        assert_eq!(distinct_values(&projects, |p| p.category.as_str()), ["Tools", "Web"]);
        assert_eq!(distinct_values(&projects, |p| p.status.as_str()), ["Done", "Active"]);
    }
}
