//! Domain types for the turn orchestrator
//!
//! Core abstractions: conversation history, agent definitions, and tool
//! descriptors.

mod agent;
mod message;

pub use agent::*;
pub use message::*;
