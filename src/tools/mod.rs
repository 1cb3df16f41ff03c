//! Tool provider port and MCP implementation
//!
//! Tool augmentation is best-effort: the orchestrator makes a single fetch
//! attempt per turn and the configured failure policy decides whether a
//! failure degrades the turn to zero tools or aborts it.

mod mcp;

pub use mcp::{strict_schema, McpToolProvider};

use async_trait::async_trait;

use crate::domain::ToolDescriptor;
use crate::error::ToolProviderResult;

/// Execution context handed to the tool provider: the agent's identity, the
/// number of completed exchanges, and the size of the accumulated history.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Name of the agent the tools will be attached to
    pub agent_name: String,
    /// Completed question/answer exchanges so far
    pub turn: usize,
    /// Accumulated messages in the history
    pub messages: usize,
}

/// Port for fetching tool descriptors from a remote provider
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Fetch tool descriptors for this turn. One attempt, no retries; the
    /// caller decides what a failure means.
    async fn fetch_tools(&self, context: &RunContext) -> ToolProviderResult<Vec<ToolDescriptor>>;
}
