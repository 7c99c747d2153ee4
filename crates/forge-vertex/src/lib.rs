//! Agent Forge platform layer.
//!
//! Everything that talks to the managed cloud platform lives here:
//!
//! - [`auth`] - service-account credential discovery and the narrow-scope
//!   bearer-token source. Every function degrades to "no credential"
//!   instead of raising; absence is a fallback condition, never fatal.
//! - [`gemini`] - `generateContent` client for the hosted generative model.
//! - [`engine`] - the [`AgentEngine`](engine::AgentEngine) seam plus the
//!   REST implementation against the reasoning-engine deployment API.
//! - [`parser`] - natural-language request to validated agent profile.
//! - [`deploy`] - asynchronous deployment orchestrator with an injected
//!   record store and per-deployment background workers.
//! - [`tester`] - ordered query-strategy chain for exercising a completed
//!   deployment.

pub mod auth;
pub mod deploy;
pub mod engine;
pub mod error;
pub mod gemini;
pub mod parser;
pub mod store;
pub mod tester;

pub use auth::{
    AccessTokenSource, NoToken, ServiceAccountTokens, StaticToken, TokenProvider, has_credentials,
};
pub use deploy::{Deployer, WARMUP_QUERY};
pub use engine::{AgentEngine, EngineSpec, HttpAgentEngine};
pub use error::{QueryError, TesterError, VertexError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use parser::{ParserError, RequirementParser};
pub use store::DeploymentStore;
pub use tester::{AgentTester, DirectModelStrategy, EngineStrategy, QueryStrategy, RestStrategy};
