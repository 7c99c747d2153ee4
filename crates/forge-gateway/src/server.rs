//! Router assembly and serving.

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers::{agents, health};
use crate::state::AppState;

/// Assemble the full application router.
///
/// CORS is deliberately permissive: the API fronts a local UI during
/// development and carries no cookies.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::health_router())
        .merge(agents::agents_router());

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / - service banner.
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Agent Forge API",
        "health": "/api/health",
    }))
}

/// Bind and serve until the process exits.
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    info!(addr = %addr, "Agent Forge API starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
