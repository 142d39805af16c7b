//! GitHub contents API client
//!
//! Delivery path for plugin exports: the token store is committed straight
//! into the app repository. The write is read-modify-write: the current blob
//! sha is fetched just before the PUT and sent as the precondition. If that
//! fetch fails for any reason the PUT goes out without a sha (a blind create).

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{api_root, GithubConfig};
use crate::error::{Result, TokenError};
use crate::tokens::TokenStore;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    #[serde(default)]
    commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Clone)]
pub struct ContentsClient {
    client: Client,
    token: String,
    repository: String,
    base_url: Url,
}

impl ContentsClient {
    pub fn new(token: impl Into<String>, repository: impl Into<String>, base_url: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("figma-tokens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token: token.into(),
            repository: repository.into(),
            base_url: api_root(base_url),
        })
    }

    pub fn from_config(config: &GithubConfig) -> Result<Self> {
        Self::new(&config.token, &config.repository, config.api_base.clone())
    }

    fn contents_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!(
                "repos/{}/contents/{}",
                self.repository,
                path.trim_start_matches('/')
            ))
            .map_err(|e| TokenError::InvalidConfig {
                key: "GITHUB_API_URL".into(),
                reason: e.to_string(),
            })
    }

    /// Current blob sha of `path` on `branch`, `None` when the file is absent.
    pub async fn get_sha(&self, path: &str, branch: &str) -> Result<Option<String>> {
        let mut url = self.contents_url(path)?;
        url.query_pairs_mut().append_pair("ref", branch);
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entry: ContentsEntry = decode(response).await?;
        Ok(Some(entry.sha))
    }

    /// Create or update `path`, returning the commit sha when GitHub reports one.
    pub async fn put_file(
        &self,
        path: &str,
        branch: &str,
        message: &str,
        contents: &[u8],
    ) -> Result<Option<String>> {
        let sha = match self.get_sha(path, branch).await {
            Ok(sha) => sha,
            Err(e) => {
                warn!(path, error = %e, "Could not read current sha, writing without precondition");
                None
            }
        };
        debug!(path, branch, has_sha = sha.is_some(), "Putting repository contents");

        let body = PutContentsRequest {
            message,
            content: STANDARD.encode(contents),
            branch,
            sha,
        };
        let response = self
            .client
            .put(self.contents_url(path)?)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;
        let put: PutContentsResponse = decode(response).await?;
        let commit = put.commit.map(|c| c.sha);
        info!(repository = %self.repository, path, branch, commit = ?commit, "Published to repository");
        Ok(commit)
    }

    pub async fn publish_store(
        &self,
        store: &TokenStore,
        path: &str,
        branch: &str,
        message: &str,
    ) -> Result<Option<String>> {
        let json = format!("{}\n", store.to_json()?);
        self.put_file(path, branch, message, json.as_bytes()).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TokenError::Upstream {
            service: "GitHub",
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
