//! Error types for the turn orchestrator

use thiserror::Error;

/// Errors that can occur during a conversation turn
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Instructions source missing or unreadable. Fatal: the turn aborts
    /// before any network step and no fallback text is produced.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Tool augmentation failed. Recovered inside the orchestrator under the
    /// default policy: the turn proceeds with zero tools.
    #[error("Tool provider error: {0}")]
    ToolProvider(#[from] ToolProviderError),

    /// The execution collaborator could not be constructed or reached.
    /// Fatal at the orchestration boundary: surfaces to the end user as a
    /// fixed fallback string, never as an error.
    #[error("Agent execution error: {0}")]
    AgentExecution(#[from] RunnerError),
}

/// Errors from the remote tool provider
#[derive(Debug, Error)]
pub enum ToolProviderError {
    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP-level error from the provider endpoint
    #[error("Provider {name} returned {status}: {message}")]
    Api {
        name: String,
        status: u16,
        message: String,
    },

    /// JSON-RPC error object in the provider response
    #[error("RPC error from {name}: [{code}] {message}")]
    Rpc {
        name: String,
        code: i32,
        message: String,
    },

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response carried no result
    #[error("No result in response from {0}")]
    EmptyResult(String),
}

impl From<reqwest::Error> for ToolProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ToolProviderError::Network(format!("Connection error: {}", err))
        } else {
            ToolProviderError::Network(err.to_string())
        }
    }
}

/// Errors from the agent-execution collaborator
#[derive(Debug, Error)]
pub enum RunnerError {
    /// API key missing at construction
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// API error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for RunnerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RunnerError::Timeout
        } else if err.is_connect() {
            RunnerError::Network(format!("Connection error: {}", err))
        } else {
            RunnerError::Network(err.to_string())
        }
    }
}

/// Result type alias for orchestrator operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Result type alias for tool provider operations
pub type ToolProviderResult<T> = Result<T, ToolProviderError>;

/// Result type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;
