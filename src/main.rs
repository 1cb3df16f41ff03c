use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use colloquy::cli::Cli;
use colloquy::config::Settings;
use colloquy::domain::{Conversation, Message};
use colloquy::orchestrator::{TurnOrchestrator, FALLBACK_REPLY};
use colloquy::runner::OpenAiRunner;
use colloquy::tools::McpToolProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up OPENAI_API_KEY and friends from .env when present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colloquy=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_path(&cli.config)?;
    cli.apply_overrides(&mut settings);

    info!(
        "Agent '{}' with {} tool provider(s), model {}",
        settings.agent.name,
        settings.tool_providers.len(),
        settings.llm.model
    );

    let tools = Arc::new(McpToolProvider::new(&settings.tool_providers));

    if let Some(question) = &cli.question {
        let answer = answer_question(&settings, tools, question, &Conversation::new()).await?;
        println!("{}", answer);
        return Ok(());
    }

    chat_loop(&settings, tools).await
}

/// One turn: construct the execution collaborator fresh, then respond.
///
/// Construction failure (missing API key) is the fatal-with-fallback class:
/// the user sees the fixed reply, not an error.
async fn answer_question(
    settings: &Settings,
    tools: Arc<McpToolProvider>,
    question: &str,
    history: &Conversation,
) -> anyhow::Result<String> {
    let runner = match OpenAiRunner::new(&settings.llm) {
        Ok(runner) => Arc::new(runner),
        Err(e) => {
            tracing::warn!("Could not construct agent runner: {}", e);
            return Ok(FALLBACK_REPLY.to_string());
        }
    };

    let orchestrator = TurnOrchestrator::new(settings, tools, runner);
    let answer = orchestrator.respond(question, history).await?;
    Ok(answer)
}

/// Interactive chat loop. Owns the conversation: the user turn is appended
/// before each respond call and the assistant turn after it.
async fn chat_loop(settings: &Settings, tools: Arc<McpToolProvider>) -> anyhow::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    let mut history = Conversation::new();

    stdout
        .write_all(b"Type your question (empty line to quit).\n> ")
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        history.push(Message::user(question));

        let answer = answer_question(settings, tools.clone(), question, &history).await?;

        history.push(Message::assistant(&answer));

        stdout.write_all(format!("{}\n> ", answer).as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
