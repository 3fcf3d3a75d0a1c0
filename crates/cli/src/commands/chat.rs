//! `marketscout` — interactive or single-message research chat.

use std::io::{BufRead, Write};
use std::sync::Arc;
use clap::Args;
use marketscout_agent::{Agent, main_agent, required_templates};
use marketscout_config::AppConfig;
use marketscout_core::message::{Conversation, Message};
use marketscout_core::session::{ModelSettings, Session};
use marketscout_core::template::{TemplateStore, names};
use marketscout_tools::TavilyClient;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub struct ChatArgs {
    /// Max turns for the main agent (default: 3)
    #[arg(long = "main-turns", value_name = "N")]
    pub main_turns: Option<u32>,

    /// Max turns for the research agent (default: 15)
    #[arg(long = "research-turns", value_name = "N")]
    pub research_turns: Option<u32>,

    /// Send a single message instead of entering interactive mode
    #[arg(short, long)]
    pub message: Option<String>,
}

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Exit,
    Reset,
    Blank,
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => Input::Exit,
        "reset" => Input::Reset,
        _ => Input::Message(line),
    }
}

/// Read stdin lines on a dedicated thread.
///
/// `tokio::io::stdin` can't be cancelled and would stall runtime shutdown
/// after Ctrl+C until Enter is pressed.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Fold the command-line turn budgets into the loaded config.
fn apply_overrides(config: &mut AppConfig, args: &ChatArgs) {
    if let Some(n) = args.main_turns {
        config.agents.main_turns = n;
    }
    if let Some(n) = args.research_turns {
        config.agents.research_turns = n;
    }
}

/// Run one user turn.
///
/// The user message stays in the conversation either way; the reply is only
/// appended when the agent succeeds.
async fn handle_turn(
    agent: &Agent,
    session: &mut Session,
    text: &str,
) -> marketscout_core::Result<String> {
    session.push(Message::user(text));
    let response = agent.process(session).await?;
    session.push(Message::assistant(&response));
    Ok(response)
}

pub async fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    // Check for API keys early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured for '{}'!", config.default_provider);
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in .env):");
        eprintln!("    MARKETSCOUT_API_KEY=...   (generic)");
        eprintln!("    OPENAI_API_KEY=sk-...     (for OpenAI)");
        eprintln!("    OPENROUTER_API_KEY=...    (for OpenRouter)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }
    let search_key = config.search.api_key.clone().ok_or(
        "No search API key found. Set TAVILY_API_KEY or search.api_key in config.toml.",
    )?;

    let templates = Arc::new(TemplateStore::new(&config.templates_dir));
    templates
        .verify(required_templates(&config.agents).as_slice())
        .map_err(|e| format!("{e} (run `marketscout onboard` to write the default templates)"))?;
    let system_prompt = templates.render(names::SYSTEM_MESSAGE, &[("tools", "")])?;

    let router = marketscout_providers::build_from_config(&config)?;
    let provider = router.default().ok_or("No default provider configured")?;
    let settings = ModelSettings::new(&config.default_model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);
    let mut session = Session::with_conversation(
        provider,
        settings,
        Conversation::with_system_prompt(system_prompt),
    );

    let backend = Arc::new(TavilyClient::with_base_url(search_key, &config.search.api_url));
    let agent = main_agent(templates, backend, &config.agents);
    info!(
        provider = %config.default_provider,
        model = %config.default_model,
        main_turns = config.agents.main_turns,
        research_turns = config.agents.research_turns,
        "Agents ready"
    );

    if let Some(msg) = args.message {
        // Single message mode
        let response = handle_turn(&agent, &mut session, &msg).await?;
        println!("{response}");
        return Ok(());
    }

    interactive(&agent, &mut session, &config).await
}

async fn interactive(
    agent: &Agent,
    session: &mut Session,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  MarketScout — Market Research Agent");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!(
        "  Turns:     main {}, research {}",
        config.agents.main_turns, config.agents.research_turns
    );
    println!();
    println!("  Type your message and press Enter to chat.");
    println!("  'reset' clears the conversation (the system message is kept).");
    println!("  'exit', 'quit' or Ctrl+C leaves the chat.");
    println!();

    let mut lines = spawn_stdin_reader();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let result = match parse_input(&line) {
            Input::Exit => break,
            Input::Blank => continue,
            Input::Reset => {
                session.reset();
                println!("  Conversation has been reset.");
                println!();
                continue;
            }
            Input::Message(text) => {
                eprintln!("  Agent is thinking...");
                tokio::select! {
                    result = handle_turn(agent, session, text) => result,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        };

        match result {
            Ok(response) => {
                println!();
                println!("{response}");
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] Error during agent processing: {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Exiting the chat. Goodbye!");
    println!();
    Ok(())
}
