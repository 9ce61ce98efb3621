use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::ResourceKey;
use crate::api::LoadError;
use crate::cache::manager::age_display;

/// Where a loaded dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Network,
}

/// Raw dataset returned by `CachedResourceLoader::load`
#[derive(Debug, Clone)]
pub struct Loaded {
    pub items: Vec<Value>,
    pub origin: Origin,
    /// When the data was fetched from the network
    pub fetched_at: DateTime<Utc>,
}

/// Decoded and normalized dataset
#[derive(Debug, Clone)]
pub struct Dataset<R> {
    pub items: Vec<R>,
    pub origin: Origin,
    pub fetched_at: DateTime<Utc>,
    /// Records that failed to decode and were left out
    pub skipped: usize,
}

impl<R> Dataset<R> {
    /// Decode each raw record as `W` and normalize it into `R`.
    /// Malformed records are skipped with a warning.
    pub fn decode<W>(resource: ResourceKey, loaded: Loaded) -> Self
    where
        W: DeserializeOwned,
        R: From<W>,
    {
        let mut items = Vec::with_capacity(loaded.items.len());
        let mut skipped = 0;

        for (index, raw) in loaded.items.into_iter().enumerate() {
            match serde_json::from_value::<W>(raw) {
                Ok(record) => items.push(R::from(record)),
                Err(e) => {
                    warn!(resource = %resource, index, error = %e, "Skipping malformed record");
                    skipped += 1;
                }
            }
        }

        Self {
            items,
            origin: loaded.origin,
            fetched_at: loaded.fetched_at,
            skipped,
        }
    }

    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        age_display((now - self.fetched_at).num_minutes())
    }
}

/// What a page shows while its data is in flight, loaded, or failed
#[derive(Debug, Clone)]
pub enum PageState<T> {
    Loading,
    Ready(T),
    Failed {
        message: String,
        /// Offer a manual retry
        retryable: bool,
    },
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState::Loading
    }
}

impl<T> PageState<T> {
    pub fn from_result(result: Result<T, LoadError>) -> Self {
        match result {
            Ok(value) => PageState::Ready(value),
            Err(e) => PageState::failed(&e),
        }
    }

    pub fn failed(error: &LoadError) -> Self {
        PageState::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
