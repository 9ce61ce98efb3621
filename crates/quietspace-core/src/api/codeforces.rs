//! Client for the public Codeforces API.
//!
//! Only the three read-only user endpoints the dashboard needs are wrapped.
//! Responses come in a `{status, comment, result}` envelope; anything other
//! than `status == "OK"` becomes `LoadError::Upstream` with the comment.

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::LoadError;
use crate::models::codeforces::{CfResponse, CfUser, CodeforcesProfile, RatingChange, Submission};

/// Public API root
pub const CODEFORCES_API_URL: &str = "https://codeforces.com/api";

#[derive(Clone)]
pub struct CodeforcesClient {
    client: Client,
    base_url: String,
    handle: String,
}

impl CodeforcesClient {
    pub fn new(handle: &str, timeout_secs: u64) -> Result<Self, LoadError> {
        Self::with_base_url(CODEFORCES_API_URL, handle, timeout_secs)
    }

    /// Point the client at another API root (used by tests)
    pub fn with_base_url(base_url: &str, handle: &str, timeout_secs: u64) -> Result<Self, LoadError> {
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
            handle: handle.to_string(),
        })
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, &str)]) -> Result<T, LoadError> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| LoadError::Transport {
                url: url.clone(),
                source,
            })?;

        // Codeforces answers 400 with a FAILED envelope for unknown handles,
        // so the body is decoded before the status is judged.
        let status = response.status();
        let body = response.text().await.map_err(|source| LoadError::Transport {
            url: url.clone(),
            source,
        })?;

        let envelope: CfResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(LoadError::from_status(status, &url)),
            Err(source) => return Err(LoadError::Decode { url, source }),
        };

        if envelope.status != "OK" {
            return Err(LoadError::Upstream(
                envelope
                    .comment
                    .unwrap_or_else(|| format!("{} failed", method)),
            ));
        }

        envelope
            .result
            .ok_or_else(|| LoadError::Upstream(format!("{} returned no result", method)))
    }

    pub async fn fetch_user_info(&self) -> Result<CfUser, LoadError> {
        let users: Vec<CfUser> = self.call("user.info", &[("handles", self.handle.as_str())]).await?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| LoadError::NotFound(format!("Codeforces user {}", self.handle)))
    }

    pub async fn fetch_rating_history(&self) -> Result<Vec<RatingChange>, LoadError> {
        self.call("user.rating", &[("handle", self.handle.as_str())]).await
    }

    pub async fn fetch_submissions(&self) -> Result<Vec<Submission>, LoadError> {
        self.call("user.status", &[("handle", self.handle.as_str())]).await
    }

    /// Fetch user info, rating history and submissions concurrently.
    /// Fails as a whole if any of the three calls fails.
    pub async fn fetch_profile(&self) -> Result<CodeforcesProfile, LoadError> {
        debug!(handle = %self.handle, "Fetching Codeforces profile");

        let (user, rating_history, submissions) = futures::try_join!(
            self.fetch_user_info(),
            self.fetch_rating_history(),
            self.fetch_submissions(),
        )?;

        info!(
            handle = %self.handle,
            contests = rating_history.len(),
            submissions = submissions.len(),
            "Loaded Codeforces profile"
        );

        Ok(CodeforcesProfile {
            user,
            rating_history,
            submissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, endpoint: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{}", endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let server = MockServer::start().await;
        mount(
            &server,
            "user.info",
            r#"{"status":"OK","result":[{"handle":"PeaceRocket","rating":1400,"rank":"specialist"}]}"#,
        )
        .await;
        mount(
            &server,
            "user.rating",
            r#"{"status":"OK","result":[{"contestId":1,"contestName":"Round 1","ratingUpdateTimeSeconds":1700000000,"oldRating":0,"newRating":1400}]}"#,
        )
        .await;
        mount(
            &server,
            "user.status",
            r#"{"status":"OK","result":[{"id":9,"creationTimeSeconds":1700000000,"problem":{"contestId":1,"index":"A","name":"Sum"},"verdict":"OK"}]}"#,
        )
        .await;

        let client = CodeforcesClient::with_base_url(&server.uri(), "PeaceRocket", 5).unwrap();
        let profile = client.fetch_profile().await.unwrap();
        assert_eq!(profile.user.rating, Some(1400));
        assert_eq!(profile.contest_count(), 1);
        assert_eq!(profile.solved_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_envelope_surfaces_comment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user.info"))
            .and(query_param("handles", "nobody"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"status":"FAILED","comment":"handles: User with handle nobody not found"}"#,
            ))
            .mount(&server)
            .await;

        let client = CodeforcesClient::with_base_url(&server.uri(), "nobody", 5).unwrap();
        let err = client.fetch_user_info().await.unwrap_err();
        match err {
            LoadError::Upstream(comment) => assert!(comment.contains("not found")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let client = CodeforcesClient::with_base_url(&server.uri(), "PeaceRocket", 5).unwrap();
        let err = client.fetch_rating_history().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
