//! API client for the portfolio content backend.
//!
//! The backend serves each dataset as a JSON array and article bodies as
//! Markdown text. The same client is used for proxy URLs, which answer with
//! the proxied document unchanged.

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use super::LoadError;
use crate::utils::markdown::safe_filename;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Public proxies can be slow; 30s still fails fast enough to move on.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| LoadError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that a response is 2xx, turning anything else into `HttpStatus`.
    fn check_response(response: reqwest::Response, url: &str) -> Result<reqwest::Response, LoadError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(LoadError::from_status(response.status(), url))
        }
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, LoadError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, accept)
            .send()
            .await
            .map_err(|source| LoadError::Transport {
                url: url.to_string(),
                source,
            })?;

        Self::check_response(response, url)
    }

    async fn read_text(response: reqwest::Response, url: &str) -> Result<String, LoadError> {
        response.text().await.map_err(|source| LoadError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// GET `url` and decode the body as a JSON array.
    ///
    /// Anything other than an array (an object, an error envelope from a
    /// proxy, `null`) is rejected with `LoadError::Shape`.
    pub async fn get_json_array(&self, url: &str) -> Result<Vec<Value>, LoadError> {
        let response = self.get(url, "application/json").await?;
        let body = Self::read_text(response, url).await?;

        let value: Value = serde_json::from_str(&body).map_err(|source| LoadError::Decode {
            url: url.to_string(),
            source,
        })?;

        match value {
            Value::Array(items) => {
                debug!(url = url, count = items.len(), "Decoded JSON array");
                Ok(items)
            }
            other => Err(LoadError::Shape {
                url: url.to_string(),
                found: json_kind(&other),
            }),
        }
    }

    /// GET `url` and return the body as text
    pub async fn get_text(&self, url: &str) -> Result<String, LoadError> {
        let response = self.get(url, "text/plain, text/markdown, */*").await?;
        Self::read_text(response, url).await
    }

    /// Endpoint serving the JSON array for a dataset, e.g. `/api/data/articles`
    pub fn data_url(&self, resource: &str) -> String {
        data_url(&self.base_url, resource)
    }

    /// Endpoint serving the Markdown body of the article with `title`
    pub fn markdown_url(&self, title: &str) -> String {
        format!(
            "{}/api/articles?title={}",
            self.base_url,
            urlencoding::encode(&safe_filename(title))
        )
    }

    /// Fetch the Markdown source of an article by its title
    pub async fn fetch_markdown(&self, title: &str) -> Result<String, LoadError> {
        let url = self.markdown_url(title);
        debug!(url = %url, "Fetching article markdown");
        self.get_text(&url).await
    }
}

/// Dataset endpoint under a backend base URL
pub fn data_url(base_url: &str, resource: &str) -> String {
    format!("{}/api/data/{}", base_url.trim_end_matches('/'), resource)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
