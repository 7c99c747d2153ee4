//! Agent pipeline endpoints.
//!
//! POST /api/parse        - free text -> structured agent profile
//! POST /api/deploy       - start an asynchronous deployment
//! GET  /api/status/{id}  - poll one deployment
//! POST /api/test         - query a completed deployment

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use forge_core::{AgentProfile, DeploymentId, ParseError};
use forge_vertex::parser::ParserError;
use forge_vertex::TesterError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub user_request: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub config: AgentProfile,
}

#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    pub config: AgentProfile,
}

#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub deployment_id: DeploymentId,
}

#[derive(Debug, Deserialize)]
pub struct TestRequest {
    pub deployment_id: String,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub response: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

fn require_credentials(state: &AppState) -> ApiResult<()> {
    if state.credentials.check() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// POST /api/parse
pub async fn parse(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_credentials(&state)?;

    let profile = state.parser.parse(&req.user_request).await.map_err(|e| {
        // A malformed model response carries the raw text so the operator
        // can see exactly what the model said.
        match e {
            ParserError::Validation(ParseError::MalformedJson { raw, source }) => {
                ApiError::Internal(format!(
                    "failed to parse model response as JSON: {source}; raw response: {raw}"
                ))
            }
            other => ApiError::Internal(other.to_string()),
        }
    })?;

    Ok(Json(ParseResponse { config: profile }))
}

/// POST /api/deploy
///
/// Returns the fresh deployment id immediately; progress is polled via
/// `GET /api/status/{id}`.
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeployRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_credentials(&state)?;

    let deployment_id = state.deployer.start(req.config);
    info!(deployment_id = %deployment_id, "deployment accepted");
    Ok(Json(DeployResponse { deployment_id }))
}

/// GET /api/status/{id}
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = DeploymentId::parse(&id)
        .ok_or_else(|| ApiError::NotFound("Deployment not found".to_string()))?;

    let snapshot = state
        .deployer
        .status(id)
        .ok_or_else(|| ApiError::NotFound("Deployment not found".to_string()))?;

    Ok(Json(snapshot))
}

/// POST /api/test
pub async fn test(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_credentials(&state)?;

    let id = DeploymentId::parse(&req.deployment_id)
        .ok_or_else(|| ApiError::NotFound("Deployment not found".to_string()))?;

    let response = state.tester.test(id, &req.query).await.map_err(|e| match e {
        TesterError::NotFound => ApiError::NotFound("Deployment not found".to_string()),
        not_ready @ TesterError::NotReady(_) => ApiError::NotFound(not_ready.to_string()),
    })?;

    Ok(Json(TestResponse { response }))
}

/// Build the agent pipeline router sub-tree.
pub fn agents_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::{get, post};
    axum::Router::new()
        .route("/parse", post(parse))
        .route("/deploy", post(deploy))
        .route("/status/{id}", get(status))
        .route("/test", post(test))
}
