use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Number of submissions shown in the "recent submissions" list
pub const RECENT_SUBMISSIONS: usize = 10;

/// Envelope wrapping every Codeforces API response
#[derive(Debug, Clone, Deserialize)]
pub struct CfResponse<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfUser {
    pub handle: String,
    pub rating: Option<i64>,
    #[serde(rename = "maxRating")]
    pub max_rating: Option<i64>,
    pub rank: Option<String>,
    #[serde(rename = "maxRank")]
    pub max_rank: Option<String>,
}

impl CfUser {
    pub fn rating_display(&self) -> String {
        self.rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "Unrated".to_string())
    }

    pub fn rank_display(&self) -> &str {
        self.rank.as_deref().unwrap_or("unrated")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    #[serde(rename = "contestId", default)]
    pub contest_id: i64,
    #[serde(rename = "contestName", default)]
    pub contest_name: String,
    #[serde(rename = "ratingUpdateTimeSeconds")]
    pub rating_update_time_seconds: i64,
    #[serde(rename = "oldRating")]
    pub old_rating: i64,
    #[serde(rename = "newRating")]
    pub new_rating: i64,
}

impl RatingChange {
    pub fn delta(&self) -> i64 {
        self.new_rating - self.old_rating
    }

    /// Short "M/D" label used under the rating chart
    pub fn date_label(&self) -> String {
        match local_datetime(self.rating_update_time_seconds) {
            Some(dt) => dt.format("%-m/%-d").to_string(),
            None => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "contestId")]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub name: String,
}

impl Problem {
    pub fn display_name(&self) -> String {
        match self.contest_id {
            Some(id) => format!("{}{}. {}", id, self.index, self.name),
            None => format!("{}. {}", self.index, self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Accepted,
    Wrong,
    Pending,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Accepted => write!(f, "Accepted"),
            SubmissionStatus::Wrong => write!(f, "Wrong"),
            SubmissionStatus::Pending => write!(f, "Pending"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "creationTimeSeconds")]
    pub creation_time_seconds: i64,
    pub problem: Problem,
    pub verdict: Option<String>,
}

impl Submission {
    pub fn status(&self) -> SubmissionStatus {
        match self.verdict.as_deref() {
            Some("OK") => SubmissionStatus::Accepted,
            Some("TESTING") => SubmissionStatus::Pending,
            _ => SubmissionStatus::Wrong,
        }
    }

    pub fn submitted_at(&self) -> Option<DateTime<Local>> {
        local_datetime(self.creation_time_seconds)
    }

    /// Calendar day of the submission in the local time zone
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.submitted_at().map(|dt| dt.date_naive())
    }
}

fn local_datetime(seconds: i64) -> Option<DateTime<Local>> {
    Local.timestamp_opt(seconds, 0).single()
}

/// Everything the Codeforces dashboard shows
#[derive(Debug, Clone, Default)]
pub struct CodeforcesProfile {
    pub user: CfUser,
    pub rating_history: Vec<RatingChange>,
    /// Newest first, as returned by `user.status`
    pub submissions: Vec<Submission>,
}

impl CodeforcesProfile {
    pub fn contest_count(&self) -> usize {
        self.rating_history.len()
    }

    /// Distinct problems with at least one accepted submission
    pub fn solved_count(&self) -> usize {
        self.submissions
            .iter()
            .filter(|s| s.status() == SubmissionStatus::Accepted)
            .map(|s| (s.problem.contest_id, s.problem.index.as_str(), s.problem.name.as_str()))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn recent_submissions(&self) -> &[Submission] {
        let n = self.submissions.len().min(RECENT_SUBMISSIONS);
        &self.submissions[..n]
    }

    /// Submission days for the heatmap calendar
    pub fn submission_dates(&self) -> Vec<NaiveDate> {
        self.submissions.iter().filter_map(|s| s.local_date()).collect()
    }

    /// Lowest rating in the history minus a margin, used as the chart floor
    pub fn chart_floor(&self) -> i64 {
        self.rating_history
            .iter()
            .map(|r| r.new_rating)
            .min()
            .map(|min| (min - 200).max(0))
            .unwrap_or(0)
    }
}
