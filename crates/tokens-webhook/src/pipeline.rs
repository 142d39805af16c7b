//! What a `tokens_updated` notification triggers
//!
//! `pull` brings the repository up to date, `regenerate` rebuilds the Swift
//! sources from the pulled token store. The HTTP layer only sees the trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use figma_tokens::config::PathsConfig;
use figma_tokens::render::{self, SwiftRenderer};
use figma_tokens::{Result, TokenError, TokenStore};
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_PULL_COMMAND: &str = "git pull";

#[async_trait]
pub trait SyncPipeline: Send + Sync {
    /// Update the working copy; returns a short summary for logs.
    async fn pull(&self) -> Result<String>;

    /// Rebuild generated sources from the token store.
    async fn regenerate(&self) -> Result<String>;
}

/// Runs the configured commands with `sh -c` inside the repository directory.
#[derive(Debug, Clone)]
pub struct ShellPipeline {
    pub repo_dir: PathBuf,
    pub pull_command: String,
    /// When unset, regeneration happens in-process with the Swift renderer.
    pub regenerate_command: Option<String>,
    pub paths: PathsConfig,
}

impl ShellPipeline {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            pull_command: DEFAULT_PULL_COMMAND.to_string(),
            regenerate_command: None,
            paths: PathsConfig::from_lookup(|_| None),
        }
    }

    /// WEBHOOK_REPO_DIR, WEBHOOK_PULL_COMMAND, WEBHOOK_REGENERATE_COMMAND,
    /// plus TOKENS_FILE and SWIFT_OUTPUT_DIR relative to the repository.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            repo_dir: var("WEBHOOK_REPO_DIR").unwrap_or_else(|| ".".into()).into(),
            pull_command: var("WEBHOOK_PULL_COMMAND")
                .unwrap_or_else(|| DEFAULT_PULL_COMMAND.to_string()),
            regenerate_command: var("WEBHOOK_REGENERATE_COMMAND"),
            paths: PathsConfig::from_env(),
        }
    }

    pub fn with_pull_command(mut self, command: impl Into<String>) -> Self {
        self.pull_command = command.into();
        self
    }

    pub fn with_regenerate_command(mut self, command: impl Into<String>) -> Self {
        self.regenerate_command = Some(command.into());
        self
    }
}

#[async_trait]
impl SyncPipeline for ShellPipeline {
    async fn pull(&self) -> Result<String> {
        run_shell(&self.pull_command, &self.repo_dir).await
    }

    async fn regenerate(&self) -> Result<String> {
        if let Some(command) = &self.regenerate_command {
            return run_shell(command, &self.repo_dir).await;
        }
        let store = TokenStore::load(self.repo_dir.join(&self.paths.tokens_file))?;
        let written = render::generate(
            &store,
            &SwiftRenderer,
            &self.repo_dir.join(&self.paths.output_dir),
        )?;
        Ok(format!("generated {} Swift files", written.len()))
    }
}

async fn run_shell(command: &str, dir: &Path) -> Result<String> {
    debug!(command, dir = %dir.display(), "Running command");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(TokenError::Command {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    info!(command, "Command finished");
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figma_tokens::{Category, Token};
    use tempfile::tempdir;

    #[tokio::test]
    async fn commands_run_in_repository_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let pipeline = ShellPipeline::new(dir.path())
            .with_pull_command("cat marker.txt")
            .with_regenerate_command("echo regenerated");

        assert_eq!(pipeline.pull().await.unwrap(), "here");
        assert_eq!(pipeline.regenerate().await.unwrap(), "regenerated");
    }

    #[tokio::test]
    async fn failing_command_reports_stderr() {
        let dir = tempdir().unwrap();
        let pipeline = ShellPipeline::new(dir.path()).with_pull_command("echo conflict >&2; exit 3");

        let err = pipeline.pull().await.unwrap_err();
        match err {
            TokenError::Command { command, stderr, .. } => {
                assert_eq!(command, "echo conflict >&2; exit 3");
                assert_eq!(stderr, "conflict");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn in_process_regeneration_writes_swift() {
        let dir = tempdir().unwrap();
        let mut store = TokenStore::new("Figma", "variables-api", "");
        store.insert(Category::Color, "primary", Token::new("#007AFF"));
        store
            .save(dir.path().join("tokens/design-tokens.json"))
            .unwrap();

        let summary = ShellPipeline::new(dir.path()).regenerate().await.unwrap();
        assert_eq!(summary, "generated 7 Swift files");
        let colors = std::fs::read_to_string(
            dir.path()
                .join("ios/DesignTokens/Generated/DesignTokens+Colors.swift"),
        )
        .unwrap();
        assert!(colors.contains(r##"Color(hex: "#007AFF")"##));
    }

    #[tokio::test]
    async fn in_process_regeneration_without_store_fails() {
        let dir = tempdir().unwrap();
        let err = ShellPipeline::new(dir.path()).regenerate().await.unwrap_err();
        assert!(matches!(err, TokenError::StoreNotFound(_)));
    }
}
