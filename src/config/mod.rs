//! Configuration for the turn orchestrator
//!
//! Settings load from `colloquy.toml` (path overridable via the CLI). A
//! missing file is allowed: every section has defaults. Persona/instructions
//! and tool-failure strictness are configuration, not code.

use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Agent identity and instructions source
    #[serde(default)]
    pub agent: AgentSettings,
    /// LLM execution collaborator
    #[serde(default)]
    pub llm: LlmSettings,
    /// External tool-provider endpoints
    #[serde(default)]
    pub tool_providers: Vec<ToolProviderConfig>,
    /// Orchestration behavior
    #[serde(default)]
    pub orchestrator: OrchestratorSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentSettings {
    /// Agent name
    #[serde(default = "default_agent_name")]
    pub name: String,
    /// Path to the UTF-8 instructions file, read once per turn
    #[serde(default = "default_instructions_path")]
    pub instructions_path: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions_path: default_instructions_path(),
        }
    }
}

fn default_agent_name() -> String {
    "assistant".to_string()
}

fn default_instructions_path() -> String {
    "prompt.txt".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmSettings {
    /// Model name/identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Custom base URL (for self-hosted or proxied endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Configuration for one remote tool-provider endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolProviderConfig {
    /// Unique name for this provider (used as the tool-name prefix)
    pub name: String,
    /// Endpoint URL (e.g., "http://localhost:3001/mcp")
    pub url: String,
    /// Optional API key for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable containing the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Connection timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_provider_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrchestratorSettings {
    /// What a tool-augmentation failure means for the turn
    #[serde(default)]
    pub on_tool_failure: ToolFailurePolicy,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            on_tool_failure: ToolFailurePolicy::default(),
        }
    }
}

/// Policy applied when tool augmentation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolFailurePolicy {
    /// Warn and proceed with zero tools
    #[default]
    Degrade,
    /// End the turn with the fixed fallback reply
    Abort,
}

impl Settings {
    /// Load settings from `colloquy.toml` in the working directory
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_path(Path::new("colloquy.toml"))
    }

    /// Load settings from a specific file; a missing file yields defaults
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        Ok(settings)
    }
}
