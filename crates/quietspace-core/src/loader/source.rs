use chrono::Duration;

/// The datasets the site loads, each with its own cache slot and lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Articles,
    Projects,
    Videos,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 3] = [ResourceKey::Articles, ResourceKey::Projects, ResourceKey::Videos];

    /// Dataset name used in URLs
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKey::Articles => "articles",
            ResourceKey::Projects => "projects",
            ResourceKey::Videos => "videos",
        }
    }

    pub fn cache_key(&self) -> &'static str {
        match self {
            ResourceKey::Articles => "articles_cache",
            ResourceKey::Projects => "projects_cache",
            ResourceKey::Videos => "videos_cache",
        }
    }

    /// How long a cached copy stays valid.
    /// Articles and projects change rarely; the video list is refreshed daily.
    pub fn ttl(&self) -> Duration {
        match self {
            ResourceKey::Articles | ResourceKey::Projects => Duration::days(7),
            ResourceKey::Videos => Duration::hours(24),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where a dataset lives: a primary URL plus proxy prefixes to fall back on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub primary_url: String,
    /// Prefixes the URL-encoded primary URL is appended to, tried in order
    pub fallback_chain: Vec<String>,
}

impl RemoteSource {
    /// A source reachable only directly, such as the operator's own backend
    pub fn direct(primary_url: impl Into<String>) -> Self {
        Self {
            primary_url: primary_url.into(),
            fallback_chain: Vec::new(),
        }
    }

    pub fn with_proxies(primary_url: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            primary_url: primary_url.into(),
            fallback_chain: proxies,
        }
    }

    pub fn proxy_url(template: &str, target: &str) -> String {
        format!("{}{}", template, urlencoding::encode(target))
    }

    /// Every URL to try, in order: the primary URL itself, then each proxy
    pub fn access_paths(&self) -> Vec<String> {
        std::iter::once(self.primary_url.clone())
            .chain(
                self.fallback_chain
                    .iter()
                    .map(|template| Self::proxy_url(template, &self.primary_url)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_keys() {
        assert_eq!(ResourceKey::Articles.cache_key(), "articles_cache");
        assert_eq!(ResourceKey::Projects.cache_key(), "projects_cache");
        assert_eq!(ResourceKey::Videos.cache_key(), "videos_cache");
        assert_eq!(ResourceKey::Projects.ttl(), Duration::days(7));
        assert_eq!(ResourceKey::Videos.ttl(), Duration::hours(24));
        assert_eq!(ResourceKey::Videos.to_string(), "videos");
    }

    #[test]
    fn test_access_paths() {
        let source = RemoteSource::with_proxies(
            "https://raw.example.com/u/data/raw/main/articles.json",
            vec![
                "https://proxy-a.example/raw?url=".to_string(),
                "https://proxy-b.example/?".to_string(),
            ],
        );
        assert_eq!(
            source.access_paths(),
            vec![
                "https://raw.example.com/u/data/raw/main/articles.json".to_string(),
                "https://proxy-a.example/raw?url=https%3A%2F%2Fraw.example.com%2Fu%2Fdata%2Fraw%2Fmain%2Farticles.json"
                    .to_string(),
                "https://proxy-b.example/?https%3A%2F%2Fraw.example.com%2Fu%2Fdata%2Fraw%2Fmain%2Farticles.json"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_direct_source_has_one_path() {
        let source = RemoteSource::direct("https://api.example.com/api/data/videos");
        assert_eq!(source.access_paths().len(), 1);
    }
}
