//! Hosted conversational runtime (reasoning-engine) client.
//!
//! [`AgentEngine`] is the seam between the orchestrator/tester and the
//! managed deployment API; tests substitute a mock, production uses
//! [`HttpAgentEngine`] against the regional REST surface.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use forge_core::PlatformSettings;
use forge_core::settings::STAGING_BUCKET;

use crate::auth::TokenProvider;
use crate::error::VertexError;

/// Model backing every hosted runtime.
pub const ENGINE_MODEL: &str = "gemini-2.0-flash";

/// Python dependency manifest shipped with every runtime creation request.
/// Fixed: the hosted runtime image is built from exactly this set.
pub const ENGINE_REQUIREMENTS: [&str; 5] = [
    "google-cloud-aiplatform[langchain,agent_engines]>=1.72.0",
    "cloudpickle==3.0.0",
    "langchain>=0.3.0,<0.4.0",
    "langchain-google-vertexai>=2.0.0,<3.0.0",
    "pydantic>=2.10",
];

/// Everything the platform needs to stand up one hosted runtime.
#[derive(Debug, Clone)]
pub struct EngineSpec {
    pub display_name: String,
    pub description: String,
    /// System message baked into the runtime.
    pub system_message: String,
}

impl EngineSpec {
    pub fn new(
        display_name: impl Into<String>,
        description: impl Into<String>,
        system_message: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            system_message: system_message.into(),
        }
    }
}

/// Managed deployment API: create a hosted runtime, query it.
#[async_trait]
pub trait AgentEngine: Send + Sync {
    /// Provision a hosted runtime; resolves to its resource name, e.g.
    /// `projects/p/locations/l/reasoningEngines/123`. Blocks (worker-side)
    /// until the platform reports the runtime ready.
    async fn create(&self, spec: &EngineSpec) -> Result<String, VertexError>;

    /// Send one input to a hosted runtime and return the raw structured
    /// response.
    async fn query(&self, resource_name: &str, input: &str)
    -> Result<serde_json::Value, VertexError>;
}

/// REST implementation against the regional `reasoningEngines` surface.
pub struct HttpAgentEngine {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    location: String,
    tokens: Arc<dyn TokenProvider>,
    poll_interval: Duration,
    max_wait: Duration,
}

impl HttpAgentEngine {
    pub fn new(settings: &PlatformSettings, tokens: Arc<dyn TokenProvider>) -> Self {
        // Creation is a long-running operation; the overall bound lives in
        // `max_wait`, so the per-request timeout only covers one round trip.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: settings.api_host(),
            project_id: settings.project_id.clone(),
            location: settings.location.clone(),
            tokens,
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(900),
        }
    }

    /// Point at a non-default host. Test hook.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Shorten the operation poll cadence. Test hook.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    async fn token(&self) -> Result<String, VertexError> {
        self.tokens
            .bearer_token()
            .await
            .ok_or_else(|| VertexError::Auth("no bearer token for deployment API".into()))
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, VertexError> {
        let token = self.token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(VertexError::from_reqwest)?;
        Self::read_json(response).await
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, VertexError> {
        let token = self.token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(VertexError::from_reqwest)?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, VertexError> {
        let status = response.status();
        let text = response.text().await.map_err(VertexError::from_reqwest)?;
        if !status.is_success() {
            return Err(VertexError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text)
            .map_err(|e| VertexError::Malformed(format!("deployment API response: {e}")))
    }

    /// Wait for a long-running operation to finish and extract the created
    /// resource name.
    async fn await_operation(&self, operation_name: &str) -> Result<String, VertexError> {
        let url = format!("{}/v1beta1/{}", self.base_url, operation_name);
        let started = std::time::Instant::now();

        loop {
            let body = self.get_json(&url).await?;
            if body.get("done").and_then(|d| d.as_bool()).unwrap_or(false) {
                if let Some(error) = body.get("error") {
                    return Err(VertexError::Api {
                        status: 500,
                        body: error.to_string(),
                    });
                }
                return body
                    .pointer("/response/name")
                    .and_then(|n| n.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        VertexError::Malformed("operation finished without a resource name".into())
                    });
            }

            if started.elapsed() > self.max_wait {
                return Err(VertexError::Timeout(format!(
                    "runtime creation did not finish within {:?}",
                    self.max_wait
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl AgentEngine for HttpAgentEngine {
    async fn create(&self, spec: &EngineSpec) -> Result<String, VertexError> {
        let url = format!(
            "{}/v1beta1/projects/{}/locations/{}/reasoningEngines",
            self.base_url, self.project_id, self.location
        );

        let body = json!({
            "displayName": spec.display_name,
            "description": spec.description,
            "spec": {
                "agentFramework": "langchain",
                "model": ENGINE_MODEL,
                "generationConfig": {
                    "temperature": 0.7,
                    "maxOutputTokens": 2048,
                },
                "systemMessage": spec.system_message,
                "packageSpec": {
                    "requirements": ENGINE_REQUIREMENTS,
                    "stagingBucket": STAGING_BUCKET,
                },
            },
        });

        info!(display_name = %spec.display_name, "submitting runtime creation");
        let response = self.post_json(&url, &body).await?;

        let name = response
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| VertexError::Malformed("creation response has no name".into()))?;

        // The API may answer with the finished resource directly or with a
        // long-running operation to poll.
        let resource_name = if name.contains("/operations/") {
            self.await_operation(name).await?
        } else {
            name.to_string()
        };

        info!(resource = %resource_name, "runtime created");
        Ok(resource_name)
    }

    async fn query(
        &self,
        resource_name: &str,
        input: &str,
    ) -> Result<serde_json::Value, VertexError> {
        let url = format!("{}/v1beta1/{}:query", self.base_url, resource_name);
        debug!(resource = %resource_name, "querying hosted runtime");
        self.post_json(&url, &json!({"input": {"input": input}}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn engine_for(server: &MockServer) -> HttpAgentEngine {
        let settings = PlatformSettings {
            project_id: "proj".into(),
            location: "loc".into(),
        };
        HttpAgentEngine::new(&settings, Arc::new(StaticToken("t".into())))
            .with_base_url(server.uri())
            .with_poll_interval(Duration::from_millis(10))
            .with_max_wait(Duration::from_secs(2))
    }

    #[tokio::test]
    async fn create_returns_resource_name_directly_when_not_an_operation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta1/projects/proj/locations/loc/reasoningEngines"))
            .and(body_partial_json(serde_json::json!({
                "spec": {"packageSpec": {"requirements": ENGINE_REQUIREMENTS}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/proj/locations/loc/reasoningEngines/42"
            })))
            .mount(&server)
            .await;

        let engine = engine_for(&server);
        let spec = EngineSpec::new("demo", "a demo agent", "be helpful");
        let resource = engine.create(&spec).await.unwrap();
        assert_eq!(resource, "projects/proj/locations/loc/reasoningEngines/42");
    }

    #[tokio::test]
    async fn create_polls_long_running_operations_to_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta1/projects/proj/locations/loc/reasoningEngines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/proj/locations/loc/operations/7"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta1/projects/proj/locations/loc/operations/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "done": true,
                "response": {"name": "projects/proj/locations/loc/reasoningEngines/99"}
            })))
            .mount(&server)
            .await;

        let engine = engine_for(&server);
        let spec = EngineSpec::new("demo", "a demo agent", "be helpful");
        let resource = engine.create(&spec).await.unwrap();
        assert_eq!(resource, "projects/proj/locations/loc/reasoningEngines/99");
    }

    #[tokio::test]
    async fn query_posts_to_the_resource_query_verb() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta1/projects/proj/locations/loc/reasoningEngines/42:query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": "pong"
            })))
            .mount(&server)
            .await;

        let engine = engine_for(&server);
        let response = engine
            .query("projects/proj/locations/loc/reasoningEngines/42", "ping")
            .await
            .unwrap();
        assert_eq!(response["output"], "pong");
    }

    #[tokio::test]
    async fn failed_creation_surfaces_the_platform_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let engine = engine_for(&server);
        let spec = EngineSpec::new("demo", "d", "s");
        match engine.create(&spec).await.unwrap_err() {
            VertexError::Api { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("quota exhausted"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
