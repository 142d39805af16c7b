//! Figma REST API Client
//!
//! Thin wrapper over `reqwest` for the two endpoints the adapters need.
//! Any non-2xx response is surfaced with its body; nothing is retried.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{FileResponse, VariablesResponse};
use crate::config::api_root;
use crate::error::{Result, TokenError};

pub const FIGMA_API_BASE: &str = "https://api.figma.com";

#[derive(Clone)]
pub struct FigmaClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl FigmaClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(FIGMA_API_BASE).map_err(|e| TokenError::InvalidConfig {
            key: "FIGMA_API_URL".into(),
            reason: e.to_string(),
        })?;
        Self::with_base_url(access_token, base_url)
    }

    pub fn with_base_url(access_token: impl Into<String>, base_url: Url) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            access_token: access_token.into(),
            base_url: api_root(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| TokenError::InvalidConfig {
                key: "FIGMA_API_URL".into(),
                reason: e.to_string(),
            })
    }

    /// GET /v1/files/{file_key}/variables/local
    pub async fn get_local_variables(&self, file_key: &str) -> Result<VariablesResponse> {
        let url = self.endpoint(&format!("v1/files/{}/variables/local", file_key))?;
        debug!(%url, "Fetching Figma local variables");
        let response = self
            .client
            .get(url)
            .header("X-Figma-Token", &self.access_token)
            .send()
            .await?;
        decode(response).await
    }

    /// GET /v1/files/{file_key}
    pub async fn get_file(&self, file_key: &str, depth: Option<u32>) -> Result<FileResponse> {
        let mut url = self.endpoint(&format!("v1/files/{}", file_key))?;
        if let Some(depth) = depth {
            url.query_pairs_mut()
                .append_pair("depth", &depth.to_string());
        }
        debug!(%url, "Fetching Figma file");
        let response = self
            .client
            .get(url)
            .header("X-Figma-Token", &self.access_token)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TokenError::Upstream {
            service: "Figma",
            status: status.as_u16(),
            body,
        });
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
