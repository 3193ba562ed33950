//! GitHub contents-API store implementation.
//!
//! The ledger object is a file in a GitHub repository. The contents API
//! returns each file with its blob SHA, and a `PUT` carrying a stale SHA is
//! rejected — which is exactly the optimistic-concurrency primitive the
//! ledger needs. The blob SHA is the version token.

use crate::error::{RemoteError, RemoteResult};
use crate::store::{RemoteBlob, RemoteLocator, RemoteStore, VersionToken};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// GitHub-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access token (or app installation token) with contents scope.
    pub token: String,
    /// Base URL for the GitHub API (e.g. `https://api.github.com`).
    pub api_base_url: String,
    /// User-Agent header value. GitHub rejects requests without one.
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: "https://api.github.com".to_string(),
            user_agent: "holoview-ledger/0.4".to_string(),
        }
    }
}

/// Contents API response structures.
#[derive(Debug, Deserialize)]
struct ContentsFile {
    sha: String,
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: PutContentsFile,
}

#[derive(Debug, Deserialize)]
struct PutContentsFile {
    sha: String,
}

/// GitHub contents-API store.
pub struct GitHubStore {
    config: GitHubConfig,
    client: Client,
}

impl GitHubStore {
    /// Creates a new GitHub store.
    pub fn new(config: GitHubConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    fn contents_url(&self, locator: &RemoteLocator) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base_url, locator.owner, locator.repo, locator.path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", &self.config.user_agent)
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    fn provider_name(&self) -> &'static str {
        "GitHub"
    }

    async fn fetch(&self, locator: &RemoteLocator) -> RemoteResult<Option<RemoteBlob>> {
        debug!("Fetching {locator}");

        let response = self
            .request(self.client.get(self.contents_url(locator)))
            .query(&[("ref", locator.branch.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("fetch failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(format!("fetch failed ({status}): {error}")));
        }

        let file: ContentsFile = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("failed to parse contents: {e}")))?;

        if file.encoding.as_deref() != Some("base64") {
            return Err(RemoteError::Api(format!(
                "unexpected content encoding for {locator}: {:?}",
                file.encoding
            )));
        }

        // GitHub wraps base64 bodies at 60 columns.
        let packed: String = file
            .content
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let content = STANDARD
            .decode(packed)
            .map_err(|e| RemoteError::Api(format!("invalid base64 content: {e}")))?;

        Ok(Some(RemoteBlob {
            content,
            version: VersionToken::new(file.sha),
        }))
    }

    async fn commit(
        &self,
        locator: &RemoteLocator,
        content: &[u8],
        message: &str,
        expected: Option<&VersionToken>,
    ) -> RemoteResult<VersionToken> {
        debug!(
            "Committing {} bytes to {locator} (expected version: {:?})",
            content.len(),
            expected.map(VersionToken::as_str)
        );

        let body = PutContentsRequest {
            message,
            content: STANDARD.encode(content),
            branch: &locator.branch,
            sha: expected.map(VersionToken::as_str),
        };

        let response = self
            .request(self.client.put(self.contents_url(locator)))
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("commit failed: {e}")))?;

        // 409: the supplied SHA is stale. 422: no SHA but the file exists.
        // Both mean another writer got there first.
        let status = response.status();
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            let error = response.text().await.unwrap_or_default();
            return Err(RemoteError::Conflict(format!("{locator}: {error}")));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(locator.to_string()));
        }
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(format!(
                "commit failed ({status}): {error}"
            )));
        }

        let put: PutContentsResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("failed to parse commit response: {e}")))?;

        Ok(VersionToken::new(put.content.sha))
    }
}
