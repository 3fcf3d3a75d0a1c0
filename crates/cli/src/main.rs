//! MarketScout CLI — the main entry point.
//!
//! Running `marketscout` with no subcommand starts the chat. Other commands:
//! - `onboard` — Write a default config and prompt templates
//! - `doctor`  — Diagnose configuration, keys, and templates

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "marketscout",
    about = "MarketScout — a conversational market research agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    chat: commands::chat::ChatArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and prompt templates
    Onboard,

    /// Diagnose configuration, API keys, and templates
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for the agent's answers.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => commands::chat::run(cli.chat).await?,
        Some(Commands::Onboard) => commands::onboard::run().await?,
        Some(Commands::Doctor) => commands::doctor::run().await?,
    }

    Ok(())
}
