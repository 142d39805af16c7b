use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokens_webhook::{build_router, AppState, ShellPipeline};

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokens_webhook=info,figma_tokens=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let pipeline = ShellPipeline::from_env();
    tracing::info!(
        repo_dir = %pipeline.repo_dir.display(),
        pull = %pipeline.pull_command,
        regenerate = pipeline.regenerate_command.as_deref().unwrap_or("<in-process>"),
        "Sync pipeline configured"
    );
    let app = build_router(AppState::new(Arc::new(pipeline)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!("Token webhook listening on http://{}", addr);
    tracing::info!("  GET  /health");
    tracing::info!("  POST /figma-webhook");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
