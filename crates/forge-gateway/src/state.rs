//! Shared application state for the API server.

use std::sync::Arc;

use forge_core::PlatformSettings;
use forge_vertex::{AgentTester, Deployer, RequirementParser};

/// How the credential-gated endpoints decide whether credentials exist.
///
/// `Fixed` lets handler tests pin the answer without touching process
/// environment variables.
pub enum CredentialProbe {
    /// Consult the real credential search chain.
    Ambient,
    /// Always answer the given value.
    Fixed(bool),
}

impl CredentialProbe {
    pub fn check(&self) -> bool {
        match self {
            CredentialProbe::Ambient => forge_vertex::has_credentials(),
            CredentialProbe::Fixed(answer) => *answer,
        }
    }
}

/// State shared across all request handlers.
pub struct AppState {
    pub settings: PlatformSettings,
    pub parser: RequirementParser,
    pub deployer: Deployer,
    pub tester: AgentTester,
    pub credentials: CredentialProbe,
}

impl AppState {
    pub fn new(
        settings: PlatformSettings,
        parser: RequirementParser,
        deployer: Deployer,
        tester: AgentTester,
        credentials: CredentialProbe,
    ) -> Arc<Self> {
        Arc::new(Self {
            settings,
            parser,
            deployer,
            tester,
            credentials,
        })
    }
}
