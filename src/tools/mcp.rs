//! MCP tool provider
//!
//! HTTP JSON-RPC client that lists tools from one or more MCP-style
//! endpoints. Only the tool-listing capability is implemented here; tool
//! invocation belongs to the agent-execution collaborator.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{RunContext, ToolProvider};
use crate::config::ToolProviderConfig;
use crate::domain::ToolDescriptor;
use crate::error::{ToolProviderError, ToolProviderResult};

/// Prefix applied to fetched tool names so descriptors from different
/// providers cannot collide.
pub const MCP_TOOL_PREFIX: &str = "mcp__";

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Tool information as returned by an MCP server
#[derive(Debug, Clone, Deserialize)]
struct McpTool {
    name: String,
    description: Option<String>,
    #[serde(rename = "inputSchema")]
    input_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ListToolsResult {
    tools: Vec<McpTool>,
}

/// One configured endpoint with its own client and timeout
struct Endpoint {
    config: ToolProviderConfig,
    client: Client,
}

impl Endpoint {
    fn new(config: ToolProviderConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    fn api_key(&self) -> Option<String> {
        if let Some(key) = &self.config.api_key {
            return Some(key.clone());
        }
        if let Some(env_var) = &self.config.api_key_env {
            return std::env::var(env_var).ok();
        }
        None
    }

    async fn list_tools(&self, context: &RunContext) -> ToolProviderResult<Vec<McpTool>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "tools/list".to_string(),
            params: Some(json!({
                "_meta": {
                    "agent": context.agent_name,
                    "turn": context.turn,
                    "messages": context.messages,
                }
            })),
        };

        let mut req_builder = self.client.post(&self.config.url).json(&request);
        if let Some(api_key) = self.api_key() {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ToolProviderError::Api {
                name: self.config.name.clone(),
                status: status.as_u16(),
                message: text,
            });
        }

        let json_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| ToolProviderError::Parse(e.to_string()))?;

        if let Some(error) = json_response.error {
            return Err(ToolProviderError::Rpc {
                name: self.config.name.clone(),
                code: error.code,
                message: error.message,
            });
        }

        let result = json_response
            .result
            .ok_or_else(|| ToolProviderError::EmptyResult(self.config.name.clone()))?;

        let list_result: ListToolsResult =
            serde_json::from_value(result).map_err(|e| ToolProviderError::Parse(e.to_string()))?;

        Ok(list_result.tools)
    }
}

/// Tool provider backed by one or more MCP endpoints.
///
/// Tools are re-fetched on every turn; nothing is cached. A failure on any
/// endpoint fails the whole attempt so the orchestrator's failure policy
/// sees a single, unambiguous outcome.
pub struct McpToolProvider {
    endpoints: Vec<Endpoint>,
}

impl McpToolProvider {
    /// Create a provider over the enabled endpoints in the configuration
    pub fn new(configs: &[ToolProviderConfig]) -> Self {
        let endpoints = configs
            .iter()
            .filter(|c| c.enabled)
            .cloned()
            .map(Endpoint::new)
            .collect();

        Self { endpoints }
    }

    /// Number of enabled endpoints
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

#[async_trait]
impl ToolProvider for McpToolProvider {
    async fn fetch_tools(&self, context: &RunContext) -> ToolProviderResult<Vec<ToolDescriptor>> {
        let mut all_tools = Vec::new();

        for endpoint in &self.endpoints {
            let tools = endpoint.list_tools(context).await?;
            debug!(
                "Fetched {} tools from provider '{}'",
                tools.len(),
                endpoint.config.name
            );

            for tool in tools {
                let prefixed_name =
                    format!("{}{}_{}", MCP_TOOL_PREFIX, endpoint.config.name, tool.name);
                all_tools.push(ToolDescriptor {
                    name: prefixed_name,
                    description: tool.description.unwrap_or_else(|| {
                        format!("MCP tool from {}", endpoint.config.name)
                    }),
                    input_schema: strict_schema(
                        tool.input_schema.unwrap_or_else(|| json!({"type": "object"})),
                    ),
                });
            }
        }

        Ok(all_tools)
    }
}

/// Convert a fetched input schema to a strict JSON Schema object.
///
/// Guarantees `"type": "object"`, a `properties` map, a `required` list that
/// covers every property, and `"additionalProperties": false`.
pub fn strict_schema(schema: Value) -> Value {
    let mut obj = match schema {
        Value::Object(o) if !o.is_empty() => o,
        _ => {
            return json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            })
        }
    };

    obj.insert("type".to_string(), json!("object"));

    if !obj.contains_key("properties") {
        obj.insert("properties".to_string(), json!({}));
    }

    let property_names: Vec<Value> = obj
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|p| p.keys().map(|k| Value::String(k.clone())).collect())
        .unwrap_or_default();
    obj.insert("required".to_string(), Value::Array(property_names));

    obj.insert("additionalProperties".to_string(), json!(false));

    Value::Object(obj)
}
