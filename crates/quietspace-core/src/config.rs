//! Application configuration management.
//!
//! Configuration is stored at `~/.config/quietspace/config.json` (or the
//! platform equivalent). Every field has a default, so a missing file or a
//! partial one both work. A few settings can be overridden from the
//! environment (or a `.env` file loaded by the binary):
//!
//! - `QUIETSPACE_API_BASE`: backend base URL
//! - `QUIETSPACE_RAW_BASE`: raw-file host base URL; also switches to raw mode
//! - `QUIETSPACE_CF_HANDLE`: Codeforces handle

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::{data_url, DEFAULT_TIMEOUT_SECS};
use crate::loader::{RemoteSource, ResourceKey, DEFAULT_RETRY_BACKOFF_MS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "quietspace";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_API_BASE: &str = "https://frp-boy.com:52171";
pub const DEFAULT_CODEFORCES_HANDLE: &str = "PeaceRocket";

/// Public proxies tried, in order, when fetching from a raw-file host
pub const DEFAULT_PROXIES: &[&str] = &[
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?url=",
    "https://api.codetabs.com/v1/proxy?quest=",
];

pub const ENV_API_BASE: &str = "QUIETSPACE_API_BASE";
pub const ENV_RAW_BASE: &str = "QUIETSPACE_RAW_BASE";
pub const ENV_CF_HANDLE: &str = "QUIETSPACE_CF_HANDLE";

/// Where the datasets are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// The operator's backend, fetched directly
    #[default]
    Backend,
    /// `<raw_base_url>/data/<name>.json` on a raw-file host, through proxies
    RawHost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub source_mode: SourceMode,
    pub raw_base_url: Option<String>,
    pub proxies: Vec<String>,
    pub codeforces_handle: String,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            source_mode: SourceMode::Backend,
            raw_base_url: None,
            proxies: DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect(),
            codeforces_handle: DEFAULT_CODEFORCES_HANDLE.to_string(),
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Write a default config file for the user to edit, unless one exists.
    /// Returns the path when a file was created.
    pub fn write_default_if_missing() -> Result<Option<PathBuf>> {
        let path = Self::config_path()?;
        Ok(Self::write_default_at(&path)?.then_some(path))
    }

    pub fn write_default_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Apply overrides looked up by variable name. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(base) = get(ENV_API_BASE) {
            self.api_base_url = base;
        }
        if let Some(raw) = get(ENV_RAW_BASE) {
            self.raw_base_url = Some(raw);
            self.source_mode = SourceMode::RawHost;
        }
        if let Some(handle) = get(ENV_CF_HANDLE) {
            self.codeforces_handle = handle;
        }
    }

    /// Where `key` is fetched from under the current source mode.
    ///
    /// Raw mode without a raw base URL falls back to the backend.
    pub fn remote_source(&self, key: ResourceKey) -> RemoteSource {
        match (self.source_mode, self.raw_base_url.as_deref()) {
            (SourceMode::RawHost, Some(raw)) => RemoteSource::with_proxies(
                format!("{}/data/{}.json", raw.trim_end_matches('/'), key.name()),
                self.proxies.clone(),
            ),
            (SourceMode::RawHost, None) => {
                warn!(resource = %key, "Raw host mode without raw_base_url, using backend");
                RemoteSource::direct(data_url(&self.api_base_url, key.name()))
            }
            (SourceMode::Backend, _) => RemoteSource::direct(data_url(&self.api_base_url, key.name())),
        }
    }
}
