//! Health and discovery endpoints.
//!
//! GET /api/health         - credential and settings probe
//! GET /api/sample-prompts - example agent descriptions

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use forge_core::prompts::SAMPLE_PROMPTS;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub has_credentials: bool,
    pub project_id: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct SamplePromptsResponse {
    pub prompts: Vec<&'static str>,
}

/// GET /api/health
///
/// Always 200 while the process is alive; the body reports whether
/// credentials resolve and which project/location are active.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        has_credentials: state.credentials.check(),
        project_id: state.settings.project_id.clone(),
        location: state.settings.location.clone(),
    })
}

/// GET /api/sample-prompts
pub async fn sample_prompts() -> impl IntoResponse {
    Json(SamplePromptsResponse {
        prompts: SAMPLE_PROMPTS.to_vec(),
    })
}

/// Build the health/discovery router sub-tree.
pub fn health_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;
    axum::Router::new()
        .route("/health", get(health))
        .route("/sample-prompts", get(sample_prompts))
}
