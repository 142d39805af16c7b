//! Error handling for the token pipeline
//!
//! One `thiserror` enum covers configuration, upstream and data errors.
//! Binaries convert it to `anyhow` at the edge; the webhook reports it as a 500.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("missing configuration: {0} is not set")]
    MissingConfig(String),

    #[error("invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("{service} API error {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token store not found at {}; run `figma-tokens sync` first", .0.display())]
    StoreNotFound(PathBuf),

    #[error("token store at {} is malformed: {source}", .path.display())]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("plugin export at {} is malformed: {source}", .path.display())]
    MalformedExport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("template error: {0}")]
    Template(String),

    #[error("command `{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenError {
    /// Configuration problems are detected before any network call.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingConfig(_) | Self::InvalidConfig { .. })
    }
}

impl From<handlebars::RenderError> for TokenError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for TokenError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_surfaces_body() {
        let err = TokenError::Upstream {
            service: "Figma",
            status: 403,
            body: "Invalid token".into(),
        };
        assert!(!err.is_config());
        assert_eq!(err.to_string(), "Figma API error 403: Invalid token");
    }

    #[test]
    fn missing_config_is_config() {
        let err = TokenError::MissingConfig("FIGMA_ACCESS_TOKEN".into());
        assert!(err.is_config());
        assert!(err.to_string().contains("FIGMA_ACCESS_TOKEN"));
    }

    #[test]
    fn store_not_found_tells_operator_to_sync() {
        let err = TokenError::StoreNotFound("tokens/design-tokens.json".into());
        assert!(err.to_string().contains("figma-tokens sync"));
    }
}
