//! Query tester: an ordered fallback chain over a completed deployment.
//!
//! The three production tiers, tried in sequence, each only when the
//! previous one was unavailable or errored:
//!
//! 1. [`EngineStrategy`] - the hosted runtime's native query interface.
//! 2. [`RestStrategy`] - a raw authenticated `generateContent` POST that
//!    replays the captured system instruction.
//! 3. [`DirectModelStrategy`] - a local model client configured with the
//!    same system instruction.
//!
//! Adding or removing a tier is a data change at the constructor, not a
//! code change here. Responses are never cached; every call is a fresh
//! round trip.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use forge_core::{DeploymentId, DeploymentOutcome, DeploymentState, PlatformSettings};

use crate::auth::TokenProvider;
use crate::engine::AgentEngine;
use crate::error::{QueryError, TesterError};
use crate::gemini::{GeminiClient, GeminiConfig};
use crate::store::DeploymentStore;

/// One tier of the fallback chain.
#[async_trait]
pub trait QueryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Answer `query` against the deployed agent described by `outcome`.
    /// Any `Err` advances the chain to the next tier.
    async fn answer(&self, outcome: &DeploymentOutcome, query: &str) -> Result<String, QueryError>;
}

/// Proxies test queries to a completed deployment through the strategy
/// chain.
pub struct AgentTester {
    store: Arc<DeploymentStore>,
    strategies: Vec<Arc<dyn QueryStrategy>>,
}

impl AgentTester {
    /// Build a tester with an explicit tier list (mostly for tests).
    pub fn new(store: Arc<DeploymentStore>, strategies: Vec<Arc<dyn QueryStrategy>>) -> Self {
        Self { store, strategies }
    }

    /// The production chain: engine, then raw REST, then direct model.
    pub fn with_default_strategies(
        store: Arc<DeploymentStore>,
        engine: Arc<dyn AgentEngine>,
        settings: &PlatformSettings,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let gemini = GeminiClient::new(GeminiConfig::new(settings), Arc::clone(&tokens));
        Self::new(
            store,
            vec![
                Arc::new(EngineStrategy::new(engine)),
                Arc::new(RestStrategy::new(settings, tokens)),
                Arc::new(DirectModelStrategy::new(gemini)),
            ],
        )
    }

    /// Send one query to a deployment.
    ///
    /// Fails fast with [`TesterError::NotFound`] for unknown ids and
    /// [`TesterError::NotReady`] when the deployment is not `Completed`.
    /// Exhausting every tier yields a best-effort error string, not an
    /// `Err`; the interactive surface always has something to show.
    pub async fn test(&self, id: DeploymentId, query: &str) -> Result<String, TesterError> {
        let state = self.store.state(id).ok_or(TesterError::NotFound)?;
        if state != DeploymentState::Completed {
            return Err(TesterError::NotReady(state));
        }
        // A completed record always carries its frozen outcome.
        let outcome = self.store.outcome(id).ok_or(TesterError::NotFound)?;

        let mut last_error: Option<QueryError> = None;
        for strategy in &self.strategies {
            match strategy.answer(&outcome, query).await {
                Ok(text) => {
                    info!(deployment_id = %id, tier = strategy.name(), "query answered");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        deployment_id = %id,
                        tier = strategy.name(),
                        error = %e,
                        "query tier did not answer; falling through"
                    );
                    last_error = Some(e);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no query strategies configured".to_string());
        Ok(format!("Error testing agent: {detail}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier 1: hosted runtime
// ─────────────────────────────────────────────────────────────────────────────

/// Queries the hosted runtime by its stored resource identifier.
pub struct EngineStrategy {
    engine: Arc<dyn AgentEngine>,
}

impl EngineStrategy {
    pub fn new(engine: Arc<dyn AgentEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl QueryStrategy for EngineStrategy {
    fn name(&self) -> &'static str {
        "engine"
    }

    async fn answer(&self, outcome: &DeploymentOutcome, query: &str) -> Result<String, QueryError> {
        let response = self
            .engine
            .query(&outcome.resource_name, query)
            .await
            .map_err(|e| QueryError::Failed(e.to_string()))?;
        Ok(extract_output(response))
    }
}

/// Structured responses expose an `output` field; anything else is
/// stringified as-is.
fn extract_output(response: serde_json::Value) -> String {
    match response.get("output") {
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => response.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier 2: raw generateContent POST
// ─────────────────────────────────────────────────────────────────────────────

/// Raw authenticated POST to the content-generation endpoint, replaying the
/// captured system instruction with the fixed generation parameters.
pub struct RestStrategy {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    project_id: String,
    location: String,
    model: String,
}

impl RestStrategy {
    pub fn new(settings: &PlatformSettings, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            tokens,
            base_url: settings.api_host(),
            project_id: settings.project_id.clone(),
            location: settings.location.clone(),
            model: "gemini-2.0-flash-exp".to_string(),
        }
    }

    /// Point at a non-default host. Test hook.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl QueryStrategy for RestStrategy {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn answer(&self, outcome: &DeploymentOutcome, query: &str) -> Result<String, QueryError> {
        let token = self
            .tokens
            .bearer_token()
            .await
            .ok_or_else(|| QueryError::Unavailable("no access token".into()))?;

        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.location,
            self.model
        );
        let payload = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": query}]}],
            "systemInstruction": {"parts": [{"text": outcome.system_instruction}]},
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2048},
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| QueryError::Failed(e.to_string()))?;

        if response.status().as_u16() != 200 {
            return Err(QueryError::Failed(format!(
                "generateContent returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| QueryError::Failed(e.to_string()))?;

        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| QueryError::Failed("no text in first candidate".into()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier 3: direct model client
// ─────────────────────────────────────────────────────────────────────────────

/// Local hosted-model client carrying the reconstructed system instruction.
pub struct DirectModelStrategy {
    gemini: GeminiClient,
}

impl DirectModelStrategy {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }
}

#[async_trait]
impl QueryStrategy for DirectModelStrategy {
    fn name(&self) -> &'static str {
        "direct-model"
    }

    async fn answer(&self, outcome: &DeploymentOutcome, query: &str) -> Result<String, QueryError> {
        self.gemini
            .generate(Some(&outcome.system_instruction), query)
            .await
            .map_err(|e| QueryError::Failed(e.to_string()))
    }
}
