//! Agent and tool domain types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named agent: behavioral instructions plus the tools it may invoke.
///
/// The tool set starts empty and is extended at most once per turn, before
/// the execution request is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Agent name
    pub name: String,
    /// Behavioral instructions (loaded from the configured instructions file)
    pub instructions: String,
    /// Tools attached for this turn
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

impl AgentDefinition {
    /// Create an agent definition with an empty tool set
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
        }
    }

    /// Attach fetched tools to the agent
    pub fn extend_tools(&mut self, tools: Vec<ToolDescriptor>) {
        self.tools.extend(tools);
    }
}

/// A callable capability descriptor sourced from a tool provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (prefixed with the provider name)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the tool's input
    pub input_schema: Value,
}

/// Best-effort outcome of contacting the tool provider(s)
#[derive(Debug, Clone)]
pub enum ToolAugmentation {
    /// Provider(s) returned a set of tool descriptors
    Tools(Vec<ToolDescriptor>),
    /// Augmentation failed; carries a human-readable reason
    Unavailable(String),
}
