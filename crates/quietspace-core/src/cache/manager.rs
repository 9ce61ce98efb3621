use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CacheError, CacheStore, Clock};

/// A cached payload and the instant it was written.
///
/// Persisted as `{"timestamp": <unix ms>, "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, data }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// Fresh while `now - timestamp < ttl`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }

    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        age_display(self.age(now).num_minutes())
    }
}

/// Human readable age such as "just now", "5m ago", "2h ago", "3d ago".
pub fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew (negative ages)
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            // Round up: 1h 30m+ becomes 2h
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// Only the timestamp of an entry, for age checks without decoding the payload
#[derive(Deserialize)]
struct EntryStamp {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
}

/// Timestamped entries with lazy TTL expiry over a shared `CacheStore`.
///
/// Read problems never reach callers: a corrupt or expired entry is removed
/// and reported as a miss.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Read the entry for `key` if it exists and is younger than `ttl`
    pub fn read<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<CacheEntry<T>> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(cache = key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(source) => {
                let err = CacheError::Corrupt {
                    key: key.to_string(),
                    source,
                };
                warn!(cache = key, error = %err, "Discarding unreadable cache entry");
                self.discard(key);
                return None;
            }
        };

        let now = self.clock.now();
        if !entry.is_fresh(now, ttl) {
            debug!(
                cache = key,
                age_minutes = entry.age(now).num_minutes(),
                "Cache entry expired"
            );
            self.discard(key);
            return None;
        }

        Some(entry)
    }

    /// Replace the entry for `key` with `data` stamped now
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        let entry = CacheEntry::new(data, self.clock.now());
        let contents = serde_json::to_string(&entry).map_err(CacheError::Serialize)?;
        self.store.set(key, &contents)?;
        debug!(cache = key, bytes = contents.len(), "Cache entry written");
        Ok(())
    }

    /// Delete the entry for `key`
    pub fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.invalidate(key) {
            warn!(cache = key, error = %e, "Failed to remove cache entry");
        }
    }

    /// Age of the entry for `key` for status display, ignoring TTL
    pub fn age_display(&self, key: &str) -> Option<String> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!(cache = key, error = %e, "Failed to load cache for age display");
                return None;
            }
        };
        let stamp: EntryStamp = serde_json::from_str(&raw).ok()?;
        Some(age_display((self.clock.now() - stamp.timestamp).num_minutes()))
    }
}

// ============================================================================
// Tests
// ============================================================================
