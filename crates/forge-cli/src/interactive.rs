//! Interactive agent-builder session.
//!
//! Walks the same pipeline the HTTP API exposes - generate configuration,
//! edit it inline, deploy with elapsed-time polling, then test queries -
//! and prints a human-readable status line for every failure tier. No step
//! is ever left pending without an indication on screen.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::Colorize;

use forge_core::prompts::{SAMPLE_PROMPTS, curl_example};
use forge_core::{AgentProfile, DeploymentState, PlatformSettings};
use forge_vertex::{
    AgentEngine, AgentTester, Deployer, DeploymentStore, GeminiClient, GeminiConfig,
    HttpAgentEngine, RequirementParser, ServiceAccountTokens, TokenProvider, has_credentials,
};

pub async fn run() -> anyhow::Result<()> {
    let settings = PlatformSettings::from_env();

    println!("{}", "Agent Forge".bold());
    println!(
        "Project: {}  Location: {}\n",
        settings.project_id.cyan(),
        settings.location.cyan()
    );

    if !has_credentials() {
        println!("{}", "Platform credentials are not configured.".yellow());
        println!(
            "Set {} to an inline service-account JSON blob, or {} to a key file path.",
            "GOOGLE_APPLICATION_CREDENTIALS_JSON".bold(),
            "GOOGLE_APPLICATION_CREDENTIALS".bold()
        );
        return Ok(());
    }

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

    // 1. Describe the agent.
    println!("{}", "Sample prompts:".bold());
    for (i, prompt) in SAMPLE_PROMPTS.iter().enumerate() {
        println!("  {}. {prompt}", i + 1);
    }
    println!();

    let request = loop {
        let line = read_line("Describe your agent (or a sample number): ")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            println!("{}", "Please enter a description.".yellow());
            continue;
        }
        // A bare number picks the corresponding sample.
        if let Ok(n) = trimmed.parse::<usize>()
            && (1..=SAMPLE_PROMPTS.len()).contains(&n)
        {
            break SAMPLE_PROMPTS[n - 1].to_string();
        }
        break trimmed.to_string();
    };

    // 2. Generate and optionally edit the configuration.
    println!("{}", "Parsing requirements with the hosted model...".dimmed());
    let mut profile = match parser.parse(&request).await {
        Ok(profile) => profile,
        Err(e) => {
            println!("{} {e}", "Failed to generate configuration:".red());
            return Ok(());
        }
    };

    loop {
        println!("\n{}", "Generated configuration:".bold());
        println!(
            "{}",
            serde_json::to_string_pretty(&profile).context("profile serializes")?
        );

        let line = read_line("\nPress Enter to deploy, or paste edited JSON: ")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        match serde_json::from_str::<AgentProfile>(trimmed) {
            Ok(edited) => {
                profile = edited;
                println!("{}", "Configuration updated.".green());
            }
            Err(e) => {
                println!("{} {e}", "Invalid JSON, keeping previous configuration:".red());
            }
        }
    }

    // 3. Deploy and poll.
    let id = deployer.start(profile);
    println!("\nDeployment {} started.", id.to_string().cyan());
    println!("{}", "This typically takes 5-10 minutes.".dimmed());

    let outcome = loop {
        tokio::time::sleep(Duration::from_secs(2)).await;
        let snapshot = deployer
            .status(id)
            .context("own deployment disappeared from the store")?;

        let minutes = (snapshot.elapsed_seconds as u64) / 60;
        let seconds = (snapshot.elapsed_seconds as u64) % 60;
        match snapshot.status {
            DeploymentState::Pending | DeploymentState::InProgress => {
                print!("\r  Deploying... {minutes}m {seconds}s elapsed");
                std::io::stdout().flush().ok();
                if snapshot.elapsed_seconds > 600.0 {
                    print!("  {}", "(taking longer than expected)".yellow());
                }
            }
            DeploymentState::Completed => {
                println!();
                break snapshot.result.context("completed deployment has a result")?;
            }
            DeploymentState::Error => {
                println!();
                println!(
                    "{} {}",
                    "Deployment failed:".red(),
                    snapshot.error.unwrap_or_else(|| "unknown error".to_string())
                );
                return Ok(());
            }
        }
    };

    println!("{}", "Agent deployed successfully!".green().bold());
    println!("  Display name: {}", outcome.display_name);
    println!("  Resource:     {}", outcome.resource_name);
    println!("  Endpoint:     {}", outcome.endpoint_url);
    if outcome.endpoint_validated {
        println!("  {}", "Endpoint validated and responding".green());
    } else {
        println!(
            "  {}",
            "Endpoint not yet validated - first query may be slow".yellow()
        );
    }

    println!("\n{}", "Raw API usage example:".bold());
    println!("{}", curl_example(&outcome.endpoint_url).dimmed());

    // 4. Test loop.
    println!("{}", "Test your agent (empty line to exit).".bold());
    loop {
        let query = read_line("> ")?;
        let query = query.trim();
        if query.is_empty() {
            break;
        }
        println!("{}", "Querying deployed agent...".dimmed());
        match tester.test(id, query).await {
            Ok(response) => println!("{response}\n"),
            Err(e) => println!("{} {e}\n", "Query failed:".red()),
        }
    }

    Ok(())
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("reading stdin")?;
    Ok(line)
}
