use clap::Parser;
use std::path::PathBuf;

/// Chat-assistant turn orchestrator with MCP tool augmentation
#[derive(Parser, Debug, Clone)]
#[command(name = "colloquy", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "COLLOQUY_CONFIG", default_value = "colloquy.toml")]
    pub config: PathBuf,

    /// Ask a single question and exit instead of starting the chat loop
    #[arg(short, long)]
    pub question: Option<String>,

    /// Path to the agent instructions file
    #[arg(long, env = "COLLOQUY_INSTRUCTIONS")]
    pub instructions: Option<PathBuf>,

    /// Model identifier for the execution collaborator
    #[arg(long, env = "COLLOQUY_MODEL")]
    pub model: Option<String>,
}

impl Cli {
    /// Apply CLI overrides to settings (CLI > env vars > config file)
    pub fn apply_overrides(&self, settings: &mut crate::config::Settings) {
        if let Some(instructions) = &self.instructions {
            settings.agent.instructions_path = instructions.display().to_string();
        }
        if let Some(model) = &self.model {
            settings.llm.model = model.clone();
        }
    }
}
