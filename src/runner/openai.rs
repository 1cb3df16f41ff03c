//! OpenAI-backed agent runner

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use super::{AgentRunner, RunOutcome, TokenUsage};
use crate::config::LlmSettings;
use crate::domain::AgentDefinition;
use crate::error::{RunnerError, RunnerResult};

/// Agent runner speaking the OpenAI chat-completions API.
///
/// The agent's instructions become the system message and the assembled
/// prompt the user message; attached tool descriptors are forwarded as
/// function tools. Non-streaming: one request, one final text.
pub struct OpenAiRunner {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiRunner {
    /// Create a runner from configuration.
    ///
    /// The API key is resolved at construction; a missing key is the
    /// fatal-with-fallback failure class at the orchestration boundary.
    pub fn new(config: &LlmSettings) -> RunnerResult<Self> {
        let env_var = config.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
        let api_key = env::var(env_var).map_err(|_| {
            RunnerError::Authentication(format!("Environment variable {} not set", env_var))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn build_request_body(&self, agent: &AgentDefinition, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": agent.instructions },
                { "role": "user", "content": prompt },
            ],
        });

        if let Some(temp) = self.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if !agent.tools.is_empty() {
            body["tools"] = json!(agent
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.input_schema,
                        }
                    })
                })
                .collect::<Vec<_>>());
        }

        body
    }
}

#[async_trait]
impl AgentRunner for OpenAiRunner {
    async fn run(&self, agent: &AgentDefinition, prompt: &str) -> RunnerResult<RunOutcome> {
        let body = self.build_request_body(agent, prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RunnerError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| RunnerError::Parse(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .first()
            .ok_or_else(|| RunnerError::Parse("No choices in response".to_string()))?;

        Ok(RunOutcome {
            final_output: choice.message.content.clone().unwrap_or_default(),
            usage: api_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
