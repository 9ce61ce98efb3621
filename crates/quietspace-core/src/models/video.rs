use serde::{Deserialize, Serialize};

use super::{loose_string, non_empty, or_default};
use crate::utils::markdown::raw_url;

pub const DEFAULT_TITLE: &str = "Untitled video";
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Video as stored in `videos.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub link: Option<String>,
    #[serde(rename = "iframeSrc", default, deserialize_with = "loose_string")]
    pub iframe_src: Option<String>,
    /// Companion notes, usually a repository "blob" URL
    #[serde(alias = "markdownPath", default, deserialize_with = "loose_string")]
    pub markdown: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    /// Embed URL with an explicit scheme
    pub embed_url: Option<String>,
    /// Raw-content URL of the companion notes
    pub notes_url: Option<String>,
}

/// Complete protocol-relative `//host/...` URLs with `https:`
pub fn embed_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else {
        src.to_string()
    }
}

impl From<VideoRecord> for Video {
    fn from(record: VideoRecord) -> Self {
        Self {
            title: or_default(record.title, DEFAULT_TITLE),
            description: or_default(record.description, DEFAULT_DESCRIPTION),
            link: non_empty(record.link),
            embed_url: non_empty(record.iframe_src).map(|s| embed_url(s.trim())),
            notes_url: non_empty(record.markdown).map(|s| raw_url(s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(value: serde_json::Value) -> Video {
        serde_json::from_value::<VideoRecord>(value).unwrap().into()
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("//player.bilibili.com/player.html?bvid=BV1"),
            "https://player.bilibili.com/player.html?bvid=BV1"
        );
        assert_eq!(embed_url("https://youtube.com/embed/x"), "https://youtube.com/embed/x");
    }

    #[test]
    fn test_normalize() {
        let v = video(json!({
            "title": "Heatmap walkthrough",
            "iframeSrc": "//player.example.com/v/1",
            "markdownPath": "https://github.com/u/notes/blob/main/v1.md"
        }));
        assert_eq!(v.title, "Heatmap walkthrough");
        assert_eq!(v.description, DEFAULT_DESCRIPTION);
        assert_eq!(v.embed_url.as_deref(), Some("https://player.example.com/v/1"));
        assert_eq!(v.notes_url.as_deref(), Some("https://github.com/u/notes/raw/main/v1.md"));
        assert!(v.link.is_none());
    }

    #[test]
    fn test_normalize_empty() {
        let v = video(json!({ "iframeSrc": "" }));
        assert_eq!(v.title, DEFAULT_TITLE);
        assert!(v.embed_url.is_none());
    }
}
