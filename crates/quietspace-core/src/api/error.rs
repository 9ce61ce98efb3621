use std::fmt;

use thiserror::Error;

/// Errors surfaced by the data loaders.
///
/// Every variant except `Exhausted` describes a single failed attempt against
/// one URL. The loader treats all of them the same way when it has more access
/// paths to try; only the final outcome reaches the caller.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Network error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected data from {url}: expected array, found {found}")]
    Shape { url: String, found: &'static str },

    #[error("All {} sources failed (last: {})", .attempts.len(), last_attempt(.attempts))]
    Exhausted { attempts: Vec<AttemptFailure> },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

fn last_attempt(attempts: &[AttemptFailure]) -> String {
    attempts
        .last()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "no sources configured".to_string())
}

impl LoadError {
    pub fn from_status(status: reqwest::StatusCode, url: &str) -> Self {
        LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
    }

    /// HTTP status carried by this error, if it came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the UI should offer a manual retry for this failure.
    /// Lookups that found nothing will not succeed on retry.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LoadError::NotFound(_))
    }
}

/// One failed attempt recorded while walking a fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub url: String,
    pub reason: String,
}

impl AttemptFailure {
    pub fn new(url: &str, error: &LoadError) -> Self {
        Self {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_code() {
        let err = LoadError::from_status(reqwest::StatusCode::BAD_GATEWAY, "https://example.com/a");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "HTTP error 502 from https://example.com/a");
    }

    #[test]
    fn test_exhausted_message_names_last_attempt() {
        let attempts = vec![
            AttemptFailure {
                url: "https://a".to_string(),
                reason: "HTTP error 500 from https://a".to_string(),
            },
            AttemptFailure {
                url: "https://b".to_string(),
                reason: "HTTP error 404 from https://b".to_string(),
            },
        ];
        let err = LoadError::Exhausted { attempts };
        let msg = err.to_string();
        assert!(msg.starts_with("All 2 sources failed"));
        assert!(msg.contains("https://b"));
    }

    #[test]
    fn test_retryable() {
        assert!(LoadError::Shape { url: "u".into(), found: "object" }.is_retryable());
        assert!(LoadError::Exhausted { attempts: vec![] }.is_retryable());
        assert!(!LoadError::NotFound("article 7".into()).is_retryable());
    }
}
