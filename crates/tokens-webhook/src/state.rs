//! Shared application state
//!
//! Holds the sync pipeline and the single-flight lock. Every
//! `tokens_updated` notification takes the lock for the whole pull and
//! regenerate sequence, so concurrent notifications run one after another.

use std::sync::Arc;

use figma_tokens::Result;
use tokio::sync::Mutex;
use tracing::info;

use crate::pipeline::SyncPipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<dyn SyncPipeline>,
    sync_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: Arc<dyn SyncPipeline>) -> Self {
        Self {
            pipeline,
            sync_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Pull then regenerate, holding the lock throughout.
    pub async fn sync(&self) -> Result<String> {
        let _guard = self.sync_lock.lock().await;
        let pulled = self.pipeline.pull().await?;
        info!(output = %pulled, "Repository updated");
        let regenerated = self.pipeline.regenerate().await?;
        info!(output = %regenerated, "Swift sources regenerated");
        Ok(regenerated)
    }
}
