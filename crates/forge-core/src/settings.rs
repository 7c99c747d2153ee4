//! Platform settings resolution.
//!
//! Project and location are resolved from the environment with fixed
//! fallbacks; there is no error path. The inline credential blob, when
//! present, may also carry the project id.

use serde::Serialize;

/// Default project used when nothing else is configured.
pub const DEFAULT_PROJECT_ID: &str = "vertex-ai-demo-468112";
/// Default region.
pub const DEFAULT_LOCATION: &str = "us-central1";
/// Staging bucket handed to the deployment API.
pub const STAGING_BUCKET: &str = "gs://vertex-agent-staging";

/// Environment variable overriding the project id.
pub const ENV_PROJECT_ID: &str = "VERTEX_AI_PROJECT_ID";
/// Environment variable overriding the location.
pub const ENV_LOCATION: &str = "VERTEX_AI_LOCATION";
/// Environment variable carrying the inline service-account JSON blob.
pub const ENV_CREDENTIALS_JSON: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";

/// Resolved `{project_id, location}` pair.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSettings {
    pub project_id: String,
    pub location: String,
}

impl PlatformSettings {
    /// Resolve settings from the process environment.
    ///
    /// Project id precedence: `VERTEX_AI_PROJECT_ID` env override, then the
    /// `project_id` embedded in the inline credential payload, then the
    /// hard-coded default. Location: `VERTEX_AI_LOCATION` env override or
    /// the hard-coded default. Always returns a value.
    pub fn from_env() -> Self {
        let project_id = std::env::var(ENV_PROJECT_ID)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(credential_payload_project_id)
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        let location = std::env::var(ENV_LOCATION)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        Self {
            project_id,
            location,
        }
    }

    /// Staging bucket for the deployment API. Fixed.
    pub fn staging_bucket(&self) -> &'static str {
        STAGING_BUCKET
    }

    /// Regional AI-platform API host, e.g.
    /// `https://us-central1-aiplatform.googleapis.com`.
    pub fn api_host(&self) -> String {
        format!("https://{}-aiplatform.googleapis.com", self.location)
    }
}

/// Best-effort extraction of `project_id` from the inline credential blob.
fn credential_payload_project_id() -> Option<String> {
    let blob = std::env::var(ENV_CREDENTIALS_JSON).ok()?;
    let value: serde_json::Value = serde_json::from_str(&blob).ok()?;
    value
        .get("project_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
