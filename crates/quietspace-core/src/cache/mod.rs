//! Local caching for remote datasets.
//!
//! A `CacheStore` is a plain key/value string store with no notion of
//! expiry. `CacheManager` layers timestamped `CacheEntry` values on top and
//! enforces TTLs lazily: an expired or unreadable entry is deleted by the read
//! that finds it.
//!
//! Cached resources:
//! - `articles_cache` (7 days)
//! - `projects_cache` (7 days)
//! - `videos_cache` (24 hours)

pub mod clock;
pub mod manager;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use manager::{CacheEntry, CacheManager};
pub use store::{CacheError, CacheStore, FileCacheStore, MemoryCacheStore};
