//! Agent-execution collaborator port
//!
//! The orchestrator invokes the runner exactly once per turn with the agent
//! definition and the assembled prompt. The invocation protocol belongs to
//! the implementation; the orchestrator only needs the final text back.

mod openai;

pub use openai::OpenAiRunner;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::AgentDefinition;
use crate::error::RunnerResult;

/// Result of one agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Final textual output of the agent, returned to the user verbatim
    pub final_output: String,
    /// Token usage, when the collaborator reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for the external agent-execution collaborator
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Execute the agent once with the given prompt
    async fn run(&self, agent: &AgentDefinition, prompt: &str) -> RunnerResult<RunOutcome>;
}
