//! tokens-webhook - regenerate Swift design tokens on Figma notifications
//!
//! `GET /health` reports liveness; `POST /figma-webhook` with event
//! `tokens_updated` pulls the repository and regenerates the Swift sources.

pub mod pipeline;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use pipeline::{ShellPipeline, SyncPipeline};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/figma-webhook", post(routes::webhook::figma_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
