//! Tool trait definition
//!
//! All tools implement this trait to provide a consistent interface.
//!
//! Failures come in two kinds. `Ok(ToolResult::error(..))` is an outcome the
//! calling agent sees as text and can react to. `Err(..)` aborts the tool
//! call and the surrounding turn.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentContext;
use crate::llm::ToolDefinition;

/// Result of executing a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The output of the tool
    pub output: String,
    /// Whether the tool execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

/// Information about a tool for permission prompts
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool
    pub name: String,
    /// Human-readable description of what this invocation will do
    pub action_description: String,
    /// Additional details about the action (e.g., the delegated prompt)
    pub details: Option<String>,
}

/// Trait for tools that the agent can use
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of this tool
    fn name(&self) -> &str;

    /// Get a description of this tool
    fn description(&self) -> &str;

    /// Get the tool definition handed to the model
    fn definition(&self) -> ToolDefinition;

    /// Get information about what this tool invocation will do
    fn get_info(&self, input: &Value) -> ToolInfo;

    /// Execute the tool with the given input
    ///
    /// `ctx` carries the calling session, message and tool call IDs.
    async fn execute(&self, input: &Value, ctx: &AgentContext) -> Result<ToolResult>;

    /// Check if this tool requires permission before execution
    fn requires_permission(&self) -> bool {
        true
    }
}
