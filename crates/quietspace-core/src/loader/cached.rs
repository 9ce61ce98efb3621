use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Dataset, Loaded, Origin, RemoteSource, ResourceKey};
use crate::api::{ApiClient, AttemptFailure, LoadError};
use crate::cache::{CacheManager, FileCacheStore, SystemClock};
use crate::config::Config;
use crate::models::{Article, ArticleRecord, Project, ProjectRecord, Video, VideoRecord};

// ============================================================================
// Constants
// ============================================================================

/// Pause between a failed attempt and the next access path.
/// Public proxies often fail transiently; one second is enough to get past
/// most hiccups without stalling the page.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// Cache-first loader for the content datasets.
///
/// Each resource has its own cache slot and `RemoteSource`. Resources without
/// an explicit source are fetched from the backend's `/api/data/<name>`.
#[derive(Clone)]
pub struct CachedResourceLoader {
    api: ApiClient,
    cache: CacheManager,
    sources: HashMap<ResourceKey, RemoteSource>,
    retry_backoff: Duration,
}

impl CachedResourceLoader {
    pub fn new(api: ApiClient, cache: CacheManager) -> Self {
        Self {
            api,
            cache,
            sources: HashMap::new(),
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }

    /// Build the production loader: file cache, system clock and the data
    /// sources selected by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.request_timeout_secs)
            .context("Failed to create HTTP client")?;

        let cache_dir = config.cache_dir()?;
        let store = FileCacheStore::new(cache_dir.clone())
            .with_context(|| format!("Failed to open cache directory {}", cache_dir.display()))?;
        let cache = CacheManager::new(Arc::new(store), Arc::new(SystemClock));

        let mut loader = Self::new(api, cache)
            .with_retry_backoff(Duration::from_millis(config.retry_backoff_ms));
        for key in ResourceKey::ALL {
            loader = loader.with_source(key, config.remote_source(key));
        }
        Ok(loader)
    }

    pub fn with_source(mut self, key: ResourceKey, source: RemoteSource) -> Self {
        self.sources.insert(key, source);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn source(&self, key: ResourceKey) -> RemoteSource {
        self.sources
            .get(&key)
            .cloned()
            .unwrap_or_else(|| RemoteSource::direct(self.api.data_url(key.name())))
    }

    /// Load the raw records of `key`.
    ///
    /// Without `force_refresh` a fresh cache entry is returned as-is and no
    /// request is made. With it the entry is deleted first, so a failed
    /// refresh leaves nothing cached.
    pub async fn load(&self, key: ResourceKey, force_refresh: bool) -> Result<Loaded, LoadError> {
        let cache_key = key.cache_key();

        if force_refresh {
            debug!(resource = %key, "Forced refresh, dropping cache entry");
            if let Err(e) = self.cache.invalidate(cache_key) {
                warn!(resource = %key, error = %e, "Failed to clear cache entry");
            }
        } else if let Some(entry) = self.cache.read::<Vec<Value>>(cache_key, key.ttl()) {
            debug!(resource = %key, count = entry.data.len(), "Serving from cache");
            return Ok(Loaded {
                items: entry.data,
                origin: Origin::Cache,
                fetched_at: entry.timestamp,
            });
        }

        let source = self.source(key);
        let items = self.fetch_with_fallback(&source).await?;
        let fetched_at = self.cache.now();

        // The data is good even if it can't be kept
        if let Err(e) = self.cache.write(cache_key, &items) {
            warn!(resource = %key, error = %e, "Failed to cache fetched data");
        }

        info!(resource = %key, count = items.len(), "Fetched from network");
        Ok(Loaded {
            items,
            origin: Origin::Network,
            fetched_at,
        })
    }

    /// Try each access path in order until one yields a JSON array.
    ///
    /// A source with a single path reports that attempt's own error; a source
    /// with proxies reports `Exhausted` with every attempt.
    async fn fetch_with_fallback(&self, source: &RemoteSource) -> Result<Vec<Value>, LoadError> {
        let paths = source.access_paths();
        let mut attempts: Vec<AttemptFailure> = Vec::with_capacity(paths.len());
        let mut last_error = None;

        for (i, url) in paths.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.retry_backoff).await;
            }

            match self.api.get_json_array(url).await {
                Ok(items) => {
                    if i > 0 {
                        info!(url = %url, attempt = i + 1, "Fallback source succeeded");
                    }
                    return Ok(items);
                }
                Err(e) => {
                    warn!(
                        url = %url,
                        attempt = i + 1,
                        of = paths.len(),
                        error = %e,
                        "Source failed"
                    );
                    attempts.push(AttemptFailure::new(url, &e));
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if paths.len() == 1 => Err(e),
            _ => Err(LoadError::Exhausted { attempts }),
        }
    }

    /// Load `key` and decode its records as `W`, normalized into `R`
    pub async fn load_records<W, R>(&self, key: ResourceKey, force_refresh: bool) -> Result<Dataset<R>, LoadError>
    where
        W: DeserializeOwned,
        R: From<W>,
    {
        let loaded = self.load(key, force_refresh).await?;
        let dataset = Dataset::decode::<W>(key, loaded);
        if dataset.skipped > 0 {
            warn!(resource = %key, skipped = dataset.skipped, "Some records were skipped");
        }
        Ok(dataset)
    }

    pub async fn load_articles(&self, force_refresh: bool) -> Result<Dataset<Article>, LoadError> {
        self.load_records::<ArticleRecord, Article>(ResourceKey::Articles, force_refresh)
            .await
    }

    pub async fn load_projects(&self, force_refresh: bool) -> Result<Dataset<Project>, LoadError> {
        self.load_records::<ProjectRecord, Project>(ResourceKey::Projects, force_refresh)
            .await
    }

    pub async fn load_videos(&self, force_refresh: bool) -> Result<Dataset<Video>, LoadError> {
        self.load_records::<VideoRecord, Video>(ResourceKey::Videos, force_refresh)
            .await
    }

    /// Markdown source of an article. Not cached.
    pub async fn fetch_markdown(&self, title: &str) -> Result<String, LoadError> {
        self.api.fetch_markdown(title).await
    }

    /// Age of the cached copy of `key`, for the status bar
    pub fn cache_age(&self, key: ResourceKey) -> Option<String> {
        self.cache.age_display(key.cache_key())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::cache::{CacheError, CacheStore, MemoryCacheStore};
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        loader: CachedResourceLoader,
        clock: Arc<ManualClock>,
        store: Arc<MemoryCacheStore>,
    }

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn harness(server: &MockServer) -> Harness {
        let clock = Arc::new(ManualClock::new(start()));
        let store = Arc::new(MemoryCacheStore::new());
        let api = ApiClient::new(&server.uri(), 5).unwrap();
        let cache = CacheManager::new(store.clone(), clock.clone());
        let loader = CachedResourceLoader::new(api, cache).with_retry_backoff(Duration::from_millis(10));
        Harness { loader, clock, store }
    }

    fn json_array(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(body.to_string())
    }

    #[tokio::test]
    async fn test_second_load_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/articles"))
            .respond_with(json_array(r#"[{"id":1},{"id":2}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let first = h.loader.load(ResourceKey::Articles, false).await.unwrap();
        assert_eq!(first.origin, Origin::Network);
        assert_eq!(first.items.len(), 2);
        assert!(h.store.get("articles_cache").unwrap().is_some());

        h.clock.advance(chrono::Duration::hours(1));
        let second = h.loader.load(ResourceKey::Articles, false).await.unwrap();
        assert_eq!(second.origin, Origin::Cache);
        assert_eq!(second.items, first.items);
        assert_eq!(second.fetched_at, start());
        assert_eq!(h.loader.cache_age(ResourceKey::Articles).as_deref(), Some("1h ago"));
    }

    #[tokio::test]
    async fn test_failed_forced_refresh_clears_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/projects"))
            .respond_with(json_array(r#"[{"id":1}]"#))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/data/projects"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.loader.load(ResourceKey::Projects, false).await.unwrap();
        assert!(h.store.get("projects_cache").unwrap().is_some());

        let err = h.loader.load(ResourceKey::Projects, true).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(h.store.get("projects_cache").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_successful_forced_refresh_replaces_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/videos"))
            .respond_with(json_array(r#"[{"title":"old"}]"#))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/data/videos"))
            .respond_with(json_array(r#"[{"title":"new"},{"title":"newer"}]"#))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.loader.load(ResourceKey::Videos, false).await.unwrap();

        h.clock.advance(chrono::Duration::minutes(10));
        let refreshed = h.loader.load(ResourceKey::Videos, true).await.unwrap();
        assert_eq!(refreshed.origin, Origin::Network);
        assert_eq!(refreshed.items.len(), 2);

        let cached = h.loader.load(ResourceKey::Videos, false).await.unwrap();
        assert_eq!(cached.origin, Origin::Cache);
        assert_eq!(cached.items, refreshed.items);
        assert_eq!(cached.fetched_at, start() + chrono::Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_ttl_boundary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/videos"))
            .respond_with(json_array("[]"))
            .expect(2)
            .mount(&server)
            .await;

        let h = harness(&server);
        h.loader.load(ResourceKey::Videos, false).await.unwrap();

        let ttl = ResourceKey::Videos.ttl();
        h.clock.set(start() + ttl - chrono::Duration::milliseconds(1));
        let hit = h.loader.load(ResourceKey::Videos, false).await.unwrap();
        assert_eq!(hit.origin, Origin::Cache);

        h.clock.set(start() + ttl + chrono::Duration::milliseconds(1));
        let miss = h.loader.load(ResourceKey::Videos, false).await.unwrap();
        assert_eq!(miss.origin, Origin::Network);
    }

    #[tokio::test]
    async fn test_proxy_fallback_in_order() {
        let server = MockServer::start().await;
        let primary = format!("{}/raw/articles.json", server.uri());

        Mock::given(method("GET"))
            .and(path("/raw/articles.json"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p1"))
            .and(query_param("url", primary.as_str()))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p2"))
            .respond_with(json_array(r#"{"contents":"wrapped"}"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p3"))
            .and(query_param("url", primary.as_str()))
            .and(header("accept", "application/json"))
            .respond_with(json_array(r#"[{"id":"from-p3"}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let proxies = ["p1", "p2", "p3"]
            .iter()
            .map(|p| format!("{}/{}?url=", server.uri(), p))
            .collect();
        let loader = h
            .loader
            .with_source(ResourceKey::Articles, RemoteSource::with_proxies(primary.clone(), proxies));

        let started = std::time::Instant::now();
        let loaded = loader.load(ResourceKey::Articles, false).await.unwrap();
        assert_eq!(loaded.origin, Origin::Network);
        assert_eq!(loaded.items[0]["id"], "from-p3");
        // One backoff before each of the three fallback attempts
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_direct_success_does_not_wait() {
        let server = MockServer::start().await;
        let primary = format!("{}/raw/projects.json", server.uri());
        Mock::given(method("GET"))
            .and(path("/raw/projects.json"))
            .respond_with(json_array(r#"[{"id":"direct"}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let backoff = Duration::from_secs(5);
        let h = harness(&server);
        let loader = h
            .loader
            .with_retry_backoff(backoff)
            .with_source(
                ResourceKey::Projects,
                RemoteSource::with_proxies(primary, vec![format!("{}/p1?url=", server.uri())]),
            );

        let started = std::time::Instant::now();
        let loaded = loader.load(ResourceKey::Projects, false).await.unwrap();
        assert_eq!(loaded.items[0]["id"], "direct");
        assert!(started.elapsed() < backoff);
    }

    #[tokio::test]
    async fn test_all_sources_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let h = harness(&server);
        let primary = format!("{}/raw/videos.json", server.uri());
        let proxies = vec![format!("{}/a?u=", server.uri()), format!("{}/b?u=", server.uri())];
        let loader = h
            .loader
            .with_source(ResourceKey::Videos, RemoteSource::with_proxies(primary.clone(), proxies));

        match loader.load(ResourceKey::Videos, false).await.unwrap_err() {
            LoadError::Exhausted { attempts } => {
                assert_eq!(attempts.len(), 3);
                assert_eq!(attempts[0].url, primary);
                assert!(attempts[1].url.contains("/a?u="));
                assert!(attempts[2].url.contains("/b?u="));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(h.store.get("videos_cache").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_path_surfaces_own_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/articles"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/data/videos"))
            .respond_with(json_array(r#"{"videos":[]}"#))
            .mount(&server)
            .await;

        let h = harness(&server);
        let err = h.loader.load(ResourceKey::Articles, false).await.unwrap_err();
        assert!(matches!(err, LoadError::HttpStatus { status: 404, .. }));

        let err = h.loader.load(ResourceKey::Videos, false).await.unwrap_err();
        assert!(matches!(err, LoadError::Shape { found: "object", .. }));
    }

    #[tokio::test]
    async fn test_corrupt_entry_refetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/projects"))
            .respond_with(json_array(r#"[{"id":1}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        h.store.set("projects_cache", "{ not json").unwrap();

        let loaded = h.loader.load(ResourceKey::Projects, false).await.unwrap();
        assert_eq!(loaded.origin, Origin::Network);
        let raw = h.store.get("projects_cache").unwrap().unwrap();
        assert!(raw.contains("\"timestamp\""));
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl CacheStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        }

        fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_fail_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/articles"))
            .respond_with(json_array(r#"[{"id":1}]"#))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), 5).unwrap();
        let cache = CacheManager::new(Arc::new(ReadOnlyStore), Arc::new(ManualClock::new(start())));
        let loader = CachedResourceLoader::new(api, cache);

        let loaded = loader.load(ResourceKey::Articles, false).await.unwrap();
        assert_eq!(loaded.items.len(), 1);
    }

    #[tokio::test]
    async fn test_typed_loaders_normalize_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data/articles"))
            .respond_with(json_array(
                r#"[{"id":1,"artiTitle":"Heatmaps","tag":"Rust"},{"_id":"x"},42]"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/data/videos"))
            .respond_with(json_array(r#"[{"title":"Demo","iframeSrc":"//player.example.com/1"}]"#))
            .mount(&server)
            .await;

        let h = harness(&server);
        let articles = h.loader.load_articles(false).await.unwrap();
        assert_eq!(articles.items.len(), 2);
        assert_eq!(articles.skipped, 1);
        assert_eq!(articles.items[0].title, "Heatmaps");
        assert_eq!(articles.items[1].id, "x");

        let videos = h.loader.load_videos(false).await.unwrap();
        assert_eq!(videos.items[0].embed_url.as_deref(), Some("https://player.example.com/1"));
    }

    #[tokio::test]
    async fn test_fetch_markdown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("title", "async-rust-notes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("## Intro\nhello"))
            .mount(&server)
            .await;

        let h = harness(&server);
        let markdown = h.loader.fetch_markdown("Async Rust Notes").await.unwrap();
        assert!(markdown.starts_with("## Intro"));
    }
}
