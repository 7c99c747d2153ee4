//! Natural-language requirement parsing.

use tracing::{debug, info};

use forge_core::{AgentProfile, ParseError, prompts};

use crate::error::VertexError;
use crate::gemini::GeminiClient;

/// Errors from one parse attempt: either the model call itself failed or
/// its response did not validate.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error(transparent)]
    Model(#[from] VertexError),

    #[error(transparent)]
    Validation(#[from] ParseError),
}

/// Turns a free-text agent description into a validated [`AgentProfile`].
///
/// One model call per request, no internal retry; success or failure is
/// surfaced directly to the caller.
pub struct RequirementParser {
    gemini: GeminiClient,
}

impl RequirementParser {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub async fn parse(&self, user_request: &str) -> Result<AgentProfile, ParserError> {
        let prompt = prompts::parsing_prompt(user_request);
        debug!(request_len = user_request.len(), "parsing agent requirements");

        let raw = self.gemini.generate(None, &prompt).await?;
        let profile = AgentProfile::from_model_json(&raw)?;

        info!(agent_name = %profile.agent_name, agent_type = %profile.agent_type, "requirements parsed");
        Ok(profile)
    }
}
