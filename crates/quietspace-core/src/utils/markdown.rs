//! Markdown helpers for the article detail and video pages.
//!
//! The terminal shows Markdown source as-is, so the only processing needed is
//! naming (file names and heading anchors) and a table of contents.

/// One `##` or `###` heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// 2 or 3
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// Turn an article title into the file name the backend stores it under.
///
/// Lowercases, replaces whitespace runs with `-` and drops everything that is
/// not an ASCII letter, digit, `_` or `-`.
pub fn safe_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        }
    }

    out
}

/// Anchor id for a heading: lowercase with whitespace runs turned into `-`
pub fn heading_anchor(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a heading line of exactly two or three `#`s
fn parse_heading(line: &str) -> Option<TocEntry> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(2..=3).contains(&hashes) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }

    Some(TocEntry {
        level: hashes as u8,
        text: text.to_string(),
        anchor: heading_anchor(text),
    })
}

/// Collect the table of contents, skipping fenced code blocks
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(entry) = parse_heading(trimmed) {
            entries.push(entry);
        }
    }

    entries
}

/// Rewrite a repository "blob" page URL to its raw-content URL
pub fn raw_url(url: &str) -> String {
    if url.contains("/blob/") {
        url.replacen("/blob/", "/raw/", 1)
    } else {
        url.to_string()
    }
}
