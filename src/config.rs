//! Environment-driven configuration
//!
//! Reads config from env vars (a `.env` file is loaded by the binaries):
//!   FIGMA_ACCESS_TOKEN: personal access token (required for network sources)
//!   FIGMA_FILE_KEY: file to read (required for network sources)
//!   FIGMA_COLLECTIONS: comma list of collection names to keep
//!   FIGMA_MODES: comma list of mode names to keep
//!   FIGMA_API_URL: API base (default: https://api.figma.com)
//!   TOKENS_FILE: token store path (default: tokens/design-tokens.json)
//!   SWIFT_OUTPUT_DIR: generated Swift directory (default: ios/DesignTokens/Generated)
//!   GITHUB_TOKEN, GITHUB_REPOSITORY, GITHUB_BRANCH, GITHUB_TOKENS_PATH, GITHUB_API_URL
//!
//! Lookups go through a closure so tests never touch the process environment.

use std::path::PathBuf;

use url::Url;

use crate::error::{Result, TokenError};
use crate::figma::FIGMA_API_BASE;
use crate::github::GITHUB_API_BASE;
use crate::source::SourceFilters;

pub const DEFAULT_TOKENS_FILE: &str = "tokens/design-tokens.json";
pub const DEFAULT_SWIFT_OUTPUT_DIR: &str = "ios/DesignTokens/Generated";

/// Paths shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct PathsConfig {
    pub tokens_file: PathBuf,
    pub output_dir: PathBuf,
}

impl PathsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            tokens_file: non_empty(&lookup, "TOKENS_FILE")
                .unwrap_or_else(|| DEFAULT_TOKENS_FILE.to_string())
                .into(),
            output_dir: non_empty(&lookup, "SWIFT_OUTPUT_DIR")
                .unwrap_or_else(|| DEFAULT_SWIFT_OUTPUT_DIR.to_string())
                .into(),
        }
    }
}

/// Credentials and filters for the network adapters.
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    pub access_token: String,
    pub file_key: String,
    pub api_base: Url,
    pub filters: SourceFilters,
}

impl FigmaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Fails on the first missing credential, before anything touches the network.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let access_token = required(&lookup, "FIGMA_ACCESS_TOKEN")?;
        let file_key = required(&lookup, "FIGMA_FILE_KEY")?;
        let api_base = parse_url(
            "FIGMA_API_URL",
            &non_empty(&lookup, "FIGMA_API_URL").unwrap_or_else(|| FIGMA_API_BASE.to_string()),
        )?;
        let filters = filters_from_lookup(&lookup);
        Ok(Self {
            access_token,
            file_key,
            api_base,
            filters,
        })
    }
}

/// Target for publishing the token store to a repository.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    pub repository: String,
    pub branch: String,
    pub path: String,
    pub api_base: Url,
}

impl GithubConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = required(&lookup, "GITHUB_TOKEN")?;
        let repository = required(&lookup, "GITHUB_REPOSITORY")?;
        if repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
            return Err(TokenError::InvalidConfig {
                key: "GITHUB_REPOSITORY".into(),
                reason: format!("expected 'owner/name', got '{}'", repository),
            });
        }
        let api_base = parse_url(
            "GITHUB_API_URL",
            &non_empty(&lookup, "GITHUB_API_URL").unwrap_or_else(|| GITHUB_API_BASE.to_string()),
        )?;
        Ok(Self {
            token,
            repository,
            branch: non_empty(&lookup, "GITHUB_BRANCH").unwrap_or_else(|| "main".to_string()),
            path: non_empty(&lookup, "GITHUB_TOKENS_PATH")
                .unwrap_or_else(|| DEFAULT_TOKENS_FILE.to_string()),
            api_base,
        })
    }
}

/// Collection and mode filters; these also apply to plugin exports, which need no credentials.
pub fn filters_from_env() -> SourceFilters {
    filters_from_lookup(&|key: &str| std::env::var(key).ok())
}

pub fn filters_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> SourceFilters {
    SourceFilters {
        collections: split_list(non_empty(lookup, "FIGMA_COLLECTIONS").as_deref()),
        modes: split_list(non_empty(lookup, "FIGMA_MODES").as_deref()),
    }
}

/// Split a comma list, trimming entries and dropping empty ones.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    non_empty(lookup, key).ok_or_else(|| TokenError::MissingConfig(key.to_string()))
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map(api_root)
        .map_err(|e| TokenError::InvalidConfig {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Ensures the path ends in `/` so relative endpoint joins keep any prefix
/// (`https://ghe.example.com/api/v3`).
pub(crate) fn api_root(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
