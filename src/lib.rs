//! # Colloquy - Chat-Assistant Turn Orchestrator
//!
//! Colloquy answers one user question at a time: it flattens the prior
//! conversation into a textual context, best-effort augments a named agent
//! with tools fetched from remote MCP-style endpoints, issues exactly one
//! request to an agent-execution collaborator, and returns the final text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use colloquy::config::Settings;
//! use colloquy::domain::Conversation;
//! use colloquy::orchestrator::TurnOrchestrator;
//! use colloquy::runner::OpenAiRunner;
//! use colloquy::tools::McpToolProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let tools = Arc::new(McpToolProvider::new(&settings.tool_providers));
//!     let runner = Arc::new(OpenAiRunner::new(&settings.llm)?);
//!     let orchestrator = TurnOrchestrator::new(&settings, tools, runner);
//!
//!     let history = Conversation::new();
//!     let answer = orchestrator.respond("hello", &history).await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: conversation history, agent definitions, tool descriptors
//! - **Orchestrator**: single-turn request assembly and failure policy
//! - **Tools / Runner**: ports to the external collaborators
//! - **Config**: layered settings with persona and strictness as data

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod runner;
pub mod tools;
