use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Weekday};

/// Truncate a string to a maximum length in characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive substring match
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Parse the loosely formatted dates found in content records.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
/// Anything after the date part of a timestamp is ignored.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Describe `at` relative to `now` for the recent submissions list.
///
/// Whole 24-hour periods elapsed decide the wording: 0 is "Today HH:MM",
/// 1 is "Yesterday HH:MM", under 7 is the weekday, older is `YYYY-MM-DD`.
pub fn relative_time<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let elapsed_days = (now.clone() - at.clone()).num_days();
    let clock = at.format("%H:%M");

    match elapsed_days {
        d if d <= 0 => format!("Today {}", clock),
        1 => format!("Yesterday {}", clock),
        d if d < 7 => format!("{} {}", weekday_name(at.weekday()), clock),
        _ => at.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        // Counts characters, not bytes
        assert_eq!(truncate_string("默认图片", 4), "默认图片");
        assert_eq!(truncate_string("默认图片标题", 5), "默认...");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Rust Async Patterns", "async"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Rust", "go"));
    }

    #[test]
    fn test_parse_record_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_record_date("2024-03-05"), expected);
        assert_eq!(parse_record_date("2024/03/05"), expected);
        assert_eq!(parse_record_date(" 2024-03-05 "), expected);
        assert_eq!(parse_record_date("2024-03-05T10:00:00Z"), expected);
        assert_eq!(parse_record_date("2024-03-05 23:59:59"), expected);
        assert_eq!(parse_record_date("Unknown date"), None);
        assert_eq!(parse_record_date(""), None);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 0).unwrap();

        let earlier_today = Utc.with_ymd_and_hms(2024, 3, 14, 14, 5, 0).unwrap();
        assert_eq!(relative_time(&earlier_today, &now), "Today 14:05");

        let yesterday = now - Duration::hours(32) - Duration::minutes(30);
        assert_eq!(relative_time(&yesterday, &now), "Yesterday 09:30");

        // 2024-03-10 was a Sunday
        let this_week = Utc.with_ymd_and_hms(2024, 3, 10, 8, 15, 0).unwrap();
        assert_eq!(relative_time(&this_week, &now), "Sun 08:15");

        let older = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(&older, &now), "2024-02-01");
    }
}
