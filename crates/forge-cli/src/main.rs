//! Agent Forge CLI - build, deploy, and test hosted agents from a terminal.

mod interactive;

use clap::{Parser, Subcommand};
use colored::Colorize;

use forge_core::prompts::SAMPLE_PROMPTS;

/// Agent Forge - create and deploy AI agents from natural language
#[derive(Parser)]
#[command(name = "forge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the example agent descriptions
    Samples,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        // Keep the interactive surface clean; warnings still get through.
        tracing_subscriber::fmt().with_env_filter("warn").init();
    }

    match cli.command {
        Some(Commands::Samples) => {
            println!("{}", "Sample prompts:".bold());
            for (i, prompt) in SAMPLE_PROMPTS.iter().enumerate() {
                println!("  {}. {prompt}", i + 1);
            }
            Ok(())
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(interactive::run())
        }
    }
}
