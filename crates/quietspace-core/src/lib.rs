//! Core library for quietspace.
//!
//! Everything the portfolio pages share lives here:
//!
//! - `loader`: `CachedResourceLoader`, the cache-first loader with ordered
//!   proxy fallback used by the articles, projects and videos pages
//! - `heatmap`: the GitHub-style contribution grid used by the project
//!   contribution chart and the Codeforces submission calendar
//! - `cache`: timestamped cache entries over a key/value store
//! - `api`: HTTP clients for the content backend and the Codeforces API
//! - `models`: record types with their normalization and filtering rules
//! - `config`: user configuration and data source selection

pub mod api;
pub mod cache;
pub mod config;
pub mod heatmap;
pub mod loader;
pub mod models;
pub mod utils;

pub use api::{ApiClient, CodeforcesClient, LoadError};
pub use cache::{CacheManager, CacheStore, FileCacheStore};
pub use config::{Config, SourceMode};
pub use heatmap::{build_grid, GridOptions, HeatmapGrid, LevelPolicy};
pub use loader::{CachedResourceLoader, Dataset, Origin, PageState, RemoteSource, ResourceKey};
