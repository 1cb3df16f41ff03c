//! Turn orchestrator
//!
//! Produces a single answer for one user question given prior history:
//! instructions load, best-effort tool augmentation, context assembly, and
//! exactly one call to the agent-execution collaborator. Everything runs
//! strictly in sequence; there are no retries and nothing is cached across
//! turns.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{Settings, ToolFailurePolicy};
use crate::domain::{AgentDefinition, Conversation, ToolAugmentation};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::runner::AgentRunner;
use crate::tools::{RunContext, ToolProvider};

/// Fixed user-facing reply for fatal execution failures. Deliberately
/// non-specific: underlying error detail goes to the log, never to the user.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm unable to reach the assistant service at the moment. Please try again later.";

/// Build the final prompt: fixed preamble, flattened history, blank-line
/// separator, fixed question label, and the question text.
pub fn build_prompt(history: &Conversation, question: &str) -> String {
    format!(
        "Context of our conversation:\n{}\n\nCurrent question: {}",
        history.render_context(),
        question
    )
}

/// Orchestrates one conversation turn against injected collaborators
pub struct TurnOrchestrator {
    agent_name: String,
    instructions_path: PathBuf,
    policy: ToolFailurePolicy,
    tools: Arc<dyn ToolProvider>,
    runner: Arc<dyn AgentRunner>,
}

impl TurnOrchestrator {
    /// Create an orchestrator from settings and collaborators
    pub fn new(
        settings: &Settings,
        tools: Arc<dyn ToolProvider>,
        runner: Arc<dyn AgentRunner>,
    ) -> Self {
        Self {
            agent_name: settings.agent.name.clone(),
            instructions_path: PathBuf::from(&settings.agent.instructions_path),
            policy: settings.orchestrator.on_tool_failure,
            tools,
            runner,
        }
    }

    /// Produce one answer for `question` given the prior `history`.
    ///
    /// The history is never mutated; the caller owns appending the new user
    /// and assistant turns around this call.
    ///
    /// Failure semantics:
    /// - missing/unreadable instructions propagate as
    ///   [`OrchestratorError::Configuration`] before any network step;
    /// - tool augmentation failure degrades to zero tools (default policy)
    ///   or ends the turn with [`FALLBACK_REPLY`] (abort policy);
    /// - any execution-collaborator failure returns [`FALLBACK_REPLY`]
    ///   instead of an error.
    pub async fn respond(
        &self,
        question: &str,
        history: &Conversation,
    ) -> OrchestratorResult<String> {
        let instructions = self.load_instructions().await?;
        let mut agent = AgentDefinition::new(&self.agent_name, instructions);

        match self.augment(history).await {
            ToolAugmentation::Tools(tools) => {
                info!("Loaded {} tools for agent '{}'", tools.len(), agent.name);
                agent.extend_tools(tools);
            }
            ToolAugmentation::Unavailable(reason) => match self.policy {
                ToolFailurePolicy::Degrade => {
                    warn!("Could not load tools: {}. Continuing without tools.", reason);
                }
                ToolFailurePolicy::Abort => {
                    warn!("Could not load tools: {}. Ending turn.", reason);
                    return Ok(FALLBACK_REPLY.to_string());
                }
            },
        }

        let prompt = build_prompt(history, question);
        debug!("Assembled prompt of {} chars", prompt.len());

        match self.runner.run(&agent, &prompt).await {
            Ok(outcome) => Ok(outcome.final_output),
            Err(e) => {
                warn!("Agent execution failed: {}", e);
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }

    /// Read the agent instructions, whitespace-trimmed. No default
    /// instructions are substituted on failure.
    async fn load_instructions(&self) -> OrchestratorResult<String> {
        let raw = tokio::fs::read_to_string(&self.instructions_path)
            .await
            .map_err(|e| {
                OrchestratorError::Configuration(format!(
                    "Failed to read instructions from {}: {}",
                    self.instructions_path.display(),
                    e
                ))
            })?;
        Ok(raw.trim().to_string())
    }

    /// Single tool-fetch attempt for this turn, converted to the
    /// best-effort augmentation outcome.
    async fn augment(&self, history: &Conversation) -> ToolAugmentation {
        let context = RunContext {
            agent_name: self.agent_name.clone(),
            turn: history.completed_turns(),
            messages: history.len(),
        };

        match self.tools.fetch_tools(&context).await {
            Ok(tools) => ToolAugmentation::Tools(tools),
            Err(e) => ToolAugmentation::Unavailable(e.to_string()),
        }
    }
}
