//! Data models for the portfolio content.
//!
//! Every content resource has a wire record whose fields are all optional,
//! converted once into a normalized model with the site's defaults filled in:
//!
//! - `ArticleRecord` → `Article`, plus `CategoryTree` and `ArticleFilter`
//! - `ProjectRecord` → `Project`, plus `ImageRef`, `ProjectFilter` and the
//!   development log helpers behind the contribution chart
//! - `VideoRecord` → `Video`
//! - Codeforces API types: `CfUser`, `RatingChange`, `Submission`

pub mod article;
pub mod codeforces;
pub mod project;
pub mod video;

pub use article::{find_article, Article, ArticleFilter, ArticleRecord, CategoryTree, RecordId};
pub use codeforces::{CfUser, CodeforcesProfile, RatingChange, Submission, SubmissionStatus};
pub use project::{
    chart_year_options, development_logs, distinct_values, log_dates, ImageKind, ImageRef,
    Project, ProjectFilter, ProjectRecord,
};
pub use video::{Video, VideoRecord};

use serde::{Deserialize, Deserializer};
use serde_json::Value;


/// Treat missing and empty strings alike
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn or_default(value: Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| default.to_string())
}

/// Strings of a JSON array. Anything that is not an array is empty; non-string
/// elements are dropped.
pub(crate) fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Scalar text field that tolerates the wrong JSON type: numbers and booleans
/// become their text, anything else is treated as missing
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Record id as a string or a number. Whole floats such as `3.0` become
/// integers; other shapes are treated as missing.
pub(crate) fn loose_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(RecordId::Text(s)),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(RecordId::Number(i)),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(RecordId::Number(f as i64))
            }
            _ => Some(RecordId::Text(n.to_string())),
        },
        _ => None,
    })
}
