//! Hosted generative model client (`generateContent`).
//!
//! Thin wrapper over the project-scoped Vertex publisher-model endpoint.
//! Calls carry a bearer token from a [`TokenProvider`]; generation
//! parameters default to the platform-wide fixed values (temperature 0.7,
//! 2048 output tokens).

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use forge_core::PlatformSettings;

use crate::auth::TokenProvider;
use crate::error::VertexError;

/// Client configuration with builder-style overrides.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API host, e.g. `https://us-central1-aiplatform.googleapis.com`.
    pub base_url: String,
    pub project_id: String,
    pub location: String,
    /// Model id, e.g. `gemini-2.0-flash-exp`.
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Defaults bound to the resolved platform settings.
    pub fn new(settings: &PlatformSettings) -> Self {
        Self {
            base_url: settings.api_host(),
            project_id: settings.project_id.clone(),
            location: settings.location.clone(),
            model: "gemini-2.0-flash-exp".to_string(),
            temperature: 0.7,
            max_output_tokens: 2048,
            timeout_secs: 60,
        }
    }

    pub fn from_env() -> Self {
        Self::new(&PlatformSettings::from_env())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full `generateContent` URL for this configuration.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.location,
            self.model
        )
    }
}

// Response shapes. Vertex uses camelCase on the wire.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            config,
            tokens,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send a single-turn request and extract the first candidate's first
    /// text part.
    ///
    /// `system` becomes the `systemInstruction`; `user` is the sole user
    /// turn. One call, no retry.
    pub async fn generate(&self, system: Option<&str>, user: &str) -> Result<String, VertexError> {
        let token = self
            .tokens
            .bearer_token()
            .await
            .ok_or_else(|| VertexError::Auth("no bearer token for model call".into()))?;

        let mut body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": user}]}],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        });
        if let Some(system) = system {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": system}]});
        }

        let url = self.config.generate_url();
        debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(VertexError::from_reqwest)?;

        let status = response.status();
        let text = response.text().await.map_err(VertexError::from_reqwest)?;

        if !status.is_success() {
            return Err(VertexError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| VertexError::Malformed(format!("generateContent response: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| VertexError::Malformed("no text part in any candidate".into()))
    }
}
