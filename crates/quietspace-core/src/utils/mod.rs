//! Utility functions for text formatting and Markdown handling.

pub mod format;
pub mod markdown;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, parse_record_date, relative_time, truncate_string};
pub use markdown::{extract_toc, heading_anchor, raw_url, safe_filename, TocEntry};
