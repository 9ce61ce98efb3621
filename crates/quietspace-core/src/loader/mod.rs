//! Cache-first loading of the content datasets.
//!
//! `CachedResourceLoader::load` serves a fresh cache entry when there is one
//! and otherwise walks the resource's access paths (the primary URL, then each
//! proxy) until one returns a JSON array, persisting the result.

pub mod cached;
pub mod source;
pub mod state;

pub use cached::{CachedResourceLoader, DEFAULT_RETRY_BACKOFF_MS};
pub use source::{RemoteSource, ResourceKey};
pub use state::{Dataset, Loaded, Origin, PageState};
