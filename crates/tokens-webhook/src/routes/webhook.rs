//! Figma change notifications
//!
//! Only `tokens_updated` has an effect. Anything else is acknowledged and
//! ignored so the sender does not retry it.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

pub const TOKENS_UPDATED: &str = "tokens_updated";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

pub async fn figma_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> (StatusCode, Json<WebhookResponse>) {
    if payload.event != TOKENS_UPDATED {
        info!(event = %payload.event, "Ignoring webhook event");
        return (
            StatusCode::OK,
            Json(WebhookResponse::ok(format!(
                "Event '{}' ignored",
                payload.event
            ))),
        );
    }

    info!(
        repository = payload.repository.as_deref().unwrap_or("-"),
        commit = payload.commit.as_deref().unwrap_or("-"),
        sent_at = payload.timestamp.as_deref().unwrap_or("-"),
        "Design tokens updated, syncing"
    );
    match state.sync().await {
        Ok(summary) => (
            StatusCode::OK,
            Json(WebhookResponse::ok(format!(
                "Design tokens updated: {}",
                summary
            ))),
        ),
        Err(e) => {
            error!(error = %e, "Token sync failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse::failed(e.to_string())),
            )
        }
    }
}
