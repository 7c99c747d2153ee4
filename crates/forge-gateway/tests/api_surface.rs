//! HTTP-surface integration tests for the gateway.
//!
//! Each test assembles a router around stubbed platform components and
//! drives it with `tower::ServiceExt::oneshot`. No sockets, no real
//! platform calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use forge_core::PlatformSettings;
use forge_gateway::build_router;
use forge_gateway::state::{AppState, CredentialProbe};
use forge_vertex::engine::{AgentEngine, EngineSpec};
use forge_vertex::error::VertexError;
use forge_vertex::tester::EngineStrategy;
use forge_vertex::{
    AgentTester, Deployer, DeploymentStore, GeminiClient, GeminiConfig, RequirementParser,
    StaticToken,
};

/// Engine stub that deploys instantly and echoes a canned answer.
struct InstantEngine;

#[async_trait]
impl AgentEngine for InstantEngine {
    async fn create(&self, _spec: &EngineSpec) -> Result<String, VertexError> {
        Ok("projects/proj/locations/loc/reasoningEngines/1".to_string())
    }

    async fn query(
        &self,
        _resource_name: &str,
        _input: &str,
    ) -> Result<serde_json::Value, VertexError> {
        Ok(serde_json::json!({"output": "canned answer"}))
    }
}

/// Engine stub whose creation never finishes within a test's lifetime.
struct StalledEngine;

#[async_trait]
impl AgentEngine for StalledEngine {
    async fn create(&self, _spec: &EngineSpec) -> Result<String, VertexError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }

    async fn query(
        &self,
        _resource_name: &str,
        _input: &str,
    ) -> Result<serde_json::Value, VertexError> {
        Err(VertexError::Network("unused".into()))
    }
}

fn settings() -> PlatformSettings {
    PlatformSettings {
        project_id: "test-project".into(),
        location: "test-loc".into(),
    }
}

fn app_with(engine: Arc<dyn AgentEngine>, credentials: bool) -> Router {
    let settings = settings();
    let tokens = Arc::new(StaticToken("t".into()));
    let store = Arc::new(DeploymentStore::new());

    // The parser's model endpoint is never reached in these tests; the
    // credential gate or the stubbed tiers answer first.
    let parser = RequirementParser::new(GeminiClient::new(
        GeminiConfig::new(&settings).with_base_url("http://127.0.0.1:9"),
        tokens,
    ));
    let deployer = Deployer::new(Arc::clone(&store), Arc::clone(&engine), settings.clone());
    let tester = AgentTester::new(store, vec![Arc::new(EngineStrategy::new(engine))]);

    build_router(AppState::new(
        settings,
        parser,
        deployer,
        tester,
        CredentialProbe::Fixed(credentials),
    ))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn sample_config() -> serde_json::Value {
    serde_json::json!({
        "agent_name": "support_agent",
        "agent_type": "conversational",
        "description": "Answers support questions.",
        "capabilities": ["faq", "orders", "returns"],
        "tools": ["search"],
        "personality": "Friendly",
        "instructions": "Help customers."
    })
}

#[tokio::test]
async fn health_reports_settings_and_credential_state() {
    let app = app_with(Arc::new(InstantEngine), false);
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["has_credentials"], false);
    assert_eq!(body["project_id"], "test-project");
    assert_eq!(body["location"], "test-loc");
}

#[tokio::test]
async fn sample_prompts_lists_all_five() {
    let app = app_with(Arc::new(InstantEngine), true);
    let response = app.oneshot(get("/api/sample-prompts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["prompts"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn parse_without_credentials_is_401() {
    let app = app_with(Arc::new(InstantEngine), false);
    let response = app
        .oneshot(post_json(
            "/api/parse",
            serde_json::json!({"user_request": "anything"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CREDENTIALS_MISSING");
}

#[tokio::test]
async fn deploy_and_test_without_credentials_are_401() {
    let app = app_with(Arc::new(InstantEngine), false);

    let deploy = app
        .clone()
        .oneshot(post_json(
            "/api/deploy",
            serde_json::json!({"config": sample_config()}),
        ))
        .await
        .unwrap();
    assert_eq!(deploy.status(), StatusCode::UNAUTHORIZED);

    let test = app
        .oneshot(post_json(
            "/api/test",
            serde_json::json!({"deployment_id": "x", "query": "q"}),
        ))
        .await
        .unwrap();
    assert_eq!(test.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_of_unknown_or_malformed_id_is_404() {
    let app = app_with(Arc::new(InstantEngine), true);

    let unknown = app
        .clone()
        .oneshot(get("/api/status/00000000-0000-4000-8000-000000000000"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let malformed = app.oneshot(get("/api/status/not-a-uuid")).await.unwrap();
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deploy_poll_test_round_trip() {
    let app = app_with(Arc::new(InstantEngine), true);

    let deploy = app
        .clone()
        .oneshot(post_json(
            "/api/deploy",
            serde_json::json!({"config": sample_config()}),
        ))
        .await
        .unwrap();
    assert_eq!(deploy.status(), StatusCode::OK);
    let deployment_id = body_json(deploy).await["deployment_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Poll until the background worker completes.
    let mut status_body = serde_json::Value::Null;
    for _ in 0..200 {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/status/{deployment_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        status_body = body_json(response).await;
        if status_body["status"] == "completed" || status_body["status"] == "error" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(status_body["status"], "completed");
    assert!(status_body["elapsed_seconds"].as_f64().unwrap() >= 0.0);
    assert_eq!(
        status_body["result"]["resource_name"],
        "projects/proj/locations/loc/reasoningEngines/1"
    );

    let test = app
        .oneshot(post_json(
            "/api/test",
            serde_json::json!({"deployment_id": deployment_id, "query": "hello?"}),
        ))
        .await
        .unwrap();
    assert_eq!(test.status(), StatusCode::OK);
    assert_eq!(body_json(test).await["response"], "canned answer");
}

#[tokio::test]
async fn testing_an_in_progress_deployment_is_404_not_a_partial_answer() {
    let app = app_with(Arc::new(StalledEngine), true);

    let deploy = app
        .clone()
        .oneshot(post_json(
            "/api/deploy",
            serde_json::json!({"config": sample_config()}),
        ))
        .await
        .unwrap();
    let deployment_id = body_json(deploy).await["deployment_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Give the worker a moment to enter in_progress.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let test = app
        .oneshot(post_json(
            "/api/test",
            serde_json::json!({"deployment_id": deployment_id, "query": "hello?"}),
        ))
        .await
        .unwrap();
    assert_eq!(test.status(), StatusCode::NOT_FOUND);
    let body = body_json(test).await;
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not complete")
    );
}
