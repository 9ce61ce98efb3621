use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{loose_id, loose_string, non_empty, or_default, string_list};
use crate::utils::format::{contains_ignore_case, parse_record_date};

pub const DEFAULT_TITLE: &str = "Untitled article";
pub const DEFAULT_DATE: &str = "Unknown date";
pub const DEFAULT_TAG: &str = "Uncategorized";
pub const DEFAULT_READ_TIME: &str = "5 min";
pub const DEFAULT_EXCERPT: &str = "No excerpt available";

/// Record ids arrive as either strings or numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{}", s),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Resolve a record id to a non-empty string
pub(crate) fn id_string(id: Option<RecordId>) -> Option<String> {
    non_empty(id.map(|id| id.to_string()))
}

/// Article as stored in `articles.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default, deserialize_with = "loose_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "_id", default, deserialize_with = "loose_id")]
    pub object_id: Option<RecordId>,
    #[serde(rename = "artiTitle", default, deserialize_with = "loose_string")]
    pub arti_title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub tag: Option<String>,
    #[serde(rename = "readTime", default, deserialize_with = "loose_string")]
    pub read_time: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub excerpt: Option<String>,
    pub categories: Option<Value>,
    #[serde(default, deserialize_with = "loose_string")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub date: String,
    pub tag: String,
    pub read_time: String,
    pub excerpt: String,
    /// Level 1, 2 and 3 category; empty when absent
    pub categories: [String; 3],
    pub link: Option<String>,
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        let title = non_empty(record.arti_title).or_else(|| non_empty(record.title));
        let date = non_empty(record.date);

        let id = id_string(record.id)
            .or_else(|| id_string(record.object_id))
            .unwrap_or_else(|| generated_id(title.as_deref(), date.as_deref()));

        let mut categories: [String; 3] = Default::default();
        for (slot, value) in categories.iter_mut().zip(string_list(record.categories)) {
            *slot = value;
        }

        Self {
            id,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: date.unwrap_or_else(|| DEFAULT_DATE.to_string()),
            tag: or_default(record.tag, DEFAULT_TAG),
            read_time: or_default(record.read_time, DEFAULT_READ_TIME),
            excerpt: or_default(record.excerpt, DEFAULT_EXCERPT),
            categories,
            link: non_empty(record.link),
        }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Id for records without one: FNV-1a over title and date, so the same
/// record gets the same id on every run and build
fn generated_id(title: Option<&str>, date: Option<&str>) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for part in [title, date] {
        // 0xff never occurs in UTF-8; 0xfe marks a missing field
        let bytes = part.map(str::as_bytes).unwrap_or(&[0xfe]);
        for &b in bytes.iter().chain(&[0xff]) {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    format!("gen-{:016x}", hash)
}

impl Article {
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_record_date(&self.date)
    }

    pub fn category(&self, level: usize) -> Option<&str> {
        self.categories
            .get(level)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// "Level 1 / Level 2 / Level 3", skipping empty levels
    pub fn category_path(&self) -> String {
        self.categories
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

pub fn find_article<'a>(articles: &'a [Article], id: &str) -> Option<&'a Article> {
    articles.iter().find(|a| a.id == id)
}

/// Three-level category hierarchy in first-seen order
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    level1: Vec<String>,
    level2: HashMap<String, Vec<String>>,
    /// Keyed by "level1|level2"
    level3: HashMap<String, Vec<String>>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn level3_key(level1: &str, level2: &str) -> String {
    format!("{}|{}", level1, level2)
}

impl CategoryTree {
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut tree = Self::default();

        for article in articles {
            let [l1, l2, l3] = &article.categories;
            if l1.is_empty() {
                continue;
            }
            push_unique(&mut tree.level1, l1);
            let children = tree.level2.entry(l1.clone()).or_default();

            if l2.is_empty() {
                continue;
            }
            push_unique(children, l2);
            let leaves = tree.level3.entry(level3_key(l1, l2)).or_default();

            if !l3.is_empty() {
                push_unique(leaves, l3);
            }
        }

        tree
    }

    pub fn level1(&self) -> &[String] {
        &self.level1
    }

    pub fn level2(&self, level1: &str) -> &[String] {
        self.level2.get(level1).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn level3(&self, level1: &str, level2: &str) -> &[String] {
        self.level3
            .get(&level3_key(level1, level2))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.level1.is_empty()
    }
}

/// Search term plus optional category selection for the article list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub search: String,
    level1: Option<String>,
    level2: Option<String>,
    level3: Option<String>,
}

impl ArticleFilter {
    pub fn level1(&self) -> Option<&str> {
        self.level1.as_deref()
    }

    pub fn level2(&self) -> Option<&str> {
        self.level2.as_deref()
    }

    pub fn level3(&self) -> Option<&str> {
        self.level3.as_deref()
    }

    /// Changing a level clears the levels below it
    pub fn set_level1(&mut self, value: Option<String>) {
        self.level1 = value;
        self.level2 = None;
        self.level3 = None;
    }

    pub fn set_level2(&mut self, value: Option<String>) {
        self.level2 = value;
        self.level3 = None;
    }

    pub fn set_level3(&mut self, value: Option<String>) {
        self.level3 = value;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.level1.is_some()
            || self.level2.is_some()
            || self.level3.is_some()
    }

    pub fn matches(&self, article: &Article) -> bool {
        let levels = [&self.level1, &self.level2, &self.level3];
        let category_match = levels
            .iter()
            .zip(article.categories.iter())
            .all(|(wanted, actual)| wanted.as_deref().map_or(true, |w| w == actual.as_str()));
        if !category_match {
            return false;
        }

        let term = self.search.trim();
        term.is_empty()
            || contains_ignore_case(&article.title, term)
            || contains_ignore_case(&article.excerpt, term)
            || contains_ignore_case(&article.tag, term)
    }

    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(value: Value) -> Article {
        serde_json::from_value::<ArticleRecord>(value).unwrap().into()
    }

    #[test]
    fn test_normalize_defaults() {
        let a = article(json!({ "id": 7 }));
        assert_eq!(a.id, "7");
        assert_eq!(a.title, DEFAULT_TITLE);
        assert_eq!(a.date, DEFAULT_DATE);
        assert_eq!(a.tag, DEFAULT_TAG);
        assert_eq!(a.read_time, DEFAULT_READ_TIME);
        assert_eq!(a.excerpt, DEFAULT_EXCERPT);
        assert_eq!(a.categories, [String::new(), String::new(), String::new()]);
        assert!(a.link.is_none());
        assert!(a.published_on().is_none());
    }

    #[test]
    fn test_normalize_fields() {
        let a = article(json!({
            "id": "rust-async",
            "artiTitle": "Async Rust",
            "date": "2024-03-05",
            "tag": "Rust",
            "readTime": "12 min",
            "excerpt": "",
            "categories": ["Programming", "Rust", "Async"]
        }));
        assert_eq!(a.id, "rust-async");
        assert_eq!(a.title, "Async Rust");
        assert_eq!(a.read_time, "12 min");
        // Empty strings take the default like missing ones
        assert_eq!(a.excerpt, DEFAULT_EXCERPT);
        assert_eq!(a.category(1), Some("Rust"));
        assert_eq!(a.category_path(), "Programming / Rust / Async");
        assert_eq!(a.published_on(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_id_fallbacks() {
        assert_eq!(article(json!({ "_id": "abc123" })).id, "abc123");

        let first = article(json!({ "title": "No id", "date": "2024-01-01" }));
        let again = article(json!({ "title": "No id", "date": "2024-01-01" }));
        let other = article(json!({ "title": "Other", "date": "2024-01-01" }));
        assert!(first.id.starts_with("gen-"));
        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
        // Falls back to `title` when `artiTitle` is missing
        assert_eq!(first.title, "No id");
    }

    #[test]
    fn test_generated_id_is_fixed() {
        assert_eq!(generated_id(Some("Heatmaps"), Some("2024-03-05")), "gen-483947cf29d3c000");
        assert_eq!(generated_id(None, None), "gen-7051767088d923e9");
        assert_ne!(generated_id(Some(""), None), generated_id(None, None));
    }

    #[test]
    fn test_non_array_categories() {
        let a = article(json!({ "id": 1, "categories": "Programming" }));
        assert_eq!(a.category_path(), "");
    }

    fn categorized(l1: &str, l2: &str, l3: &str) -> Article {
        article(json!({ "id": format!("{l1}{l2}{l3}"), "categories": [l1, l2, l3] }))
    }

    #[test]
    fn test_category_tree() {
        let articles = vec![
            categorized("Programming", "Rust", "Async"),
            categorized("Programming", "Rust", "Macros"),
            categorized("Programming", "Go", ""),
            categorized("Life", "", ""),
            categorized("", "Orphan", "Leaf"),
            categorized("Programming", "Rust", "Async"),
        ];
        let tree = CategoryTree::from_articles(&articles);

        assert_eq!(tree.level1(), ["Programming", "Life"]);
        assert_eq!(tree.level2("Programming"), ["Rust", "Go"]);
        assert!(tree.level2("Life").is_empty());
        assert_eq!(tree.level3("Programming", "Rust"), ["Async", "Macros"]);
        assert!(tree.level3("Programming", "Go").is_empty());
        assert!(tree.level2("Missing").is_empty());
    }

    #[test]
    fn test_filter_by_search() {
        let articles = vec![
            article(json!({ "id": 1, "artiTitle": "Async Rust", "tag": "Rust" })),
            article(json!({ "id": 2, "artiTitle": "Go channels", "excerpt": "Talking about ASYNC code" })),
            article(json!({ "id": 3, "artiTitle": "Gardening", "tag": "Life" })),
        ];
        let mut filter = ArticleFilter {
            search: "  async ".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&articles).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);

        filter.search = "life".to_string();
        let ids: Vec<_> = filter.apply(&articles).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["3"]);

        filter.reset();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&articles).len(), 3);
    }

    #[test]
    fn test_filter_by_category_levels() {
        let articles = vec![
            categorized("Programming", "Rust", "Async"),
            categorized("Programming", "Rust", "Macros"),
            categorized("Programming", "Go", ""),
            categorized("Life", "", ""),
        ];
        let mut filter = ArticleFilter::default();

        filter.set_level1(Some("Programming".into()));
        assert_eq!(filter.apply(&articles).len(), 3);

        filter.set_level2(Some("Rust".into()));
        filter.set_level3(Some("Macros".into()));
        let matched = filter.apply(&articles);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].category(2), Some("Macros"));

        // Picking another level 1 clears the lower levels
        filter.set_level1(Some("Life".into()));
        assert_eq!(filter.level2(), None);
        assert_eq!(filter.level3(), None);
        assert_eq!(filter.apply(&articles).len(), 1);
    }

    #[test]
    fn test_find_article() {
        let articles = vec![article(json!({ "id": 1 })), article(json!({ "id": "two" }))];
        assert_eq!(find_article(&articles, "two").map(|a| a.id.as_str()), Some("two"));
        assert!(find_article(&articles, "3").is_none());
    }
}
