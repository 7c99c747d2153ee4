//! `forge-gateway` binary: the Agent Forge HTTP API.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use forge_core::PlatformSettings;
use forge_gateway::state::{AppState, CredentialProbe};
use forge_vertex::{
    AgentEngine, AgentTester, Deployer, DeploymentStore, GeminiClient, GeminiConfig,
    HttpAgentEngine, RequirementParser, ServiceAccountTokens, TokenProvider,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = PlatformSettings::from_env();
    info!(
        project_id = %settings.project_id,
        location = %settings.location,
        "resolved platform settings"
    );

    let tokens: Arc<dyn TokenProvider> = Arc::new(ServiceAccountTokens::new());
    let engine: Arc<dyn AgentEngine> =
        Arc::new(HttpAgentEngine::new(&settings, Arc::clone(&tokens)));
    let store = Arc::new(DeploymentStore::new());

    let parser = RequirementParser::new(GeminiClient::new(
        GeminiConfig::new(&settings),
        Arc::clone(&tokens),
    ));
    let deployer = Deployer::new(Arc::clone(&store), Arc::clone(&engine), settings.clone());
    let tester = AgentTester::with_default_strategies(store, engine, &settings, tokens);

    let state = AppState::new(
        settings,
        parser,
        deployer,
        tester,
        CredentialProbe::Ambient,
    );

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    forge_gateway::server::serve(state, port).await
}
