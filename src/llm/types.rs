//! Tool definitions and token usage
//!
//! These follow the Anthropic wire shape; runtimes targeting other providers
//! translate them internally.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Tool Definitions
// ============================================================================

/// Tool definition handed to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolDefinition {
    /// Custom tool with JSON schema
    Custom(CustomTool),
}

impl ToolDefinition {
    /// Name of the defined tool
    pub fn name(&self) -> &str {
        match self {
            ToolDefinition::Custom(tool) => &tool.name,
        }
    }
}

/// Custom tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTool {
    /// Tool name
    pub name: String,

    /// Tool description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON schema for the tool input
    pub input_schema: ToolInputSchema,
}

/// JSON schema for tool input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    /// Type (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Properties of the input object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,

    /// Required properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ToolInputSchema {
    /// Create a new tool input schema
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: None,
            required: None,
        }
    }

    /// Set the properties
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Set the required fields
    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = Some(required);
        self
    }
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Usage
// ============================================================================

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens used
    pub input_tokens: u32,

    /// Output tokens generated
    pub output_tokens: u32,

    /// Cache creation tokens (if caching enabled)
    #[serde(default)]
    pub cache_creation_input_tokens: Option<u32>,

    /// Cache read tokens (if caching enabled)
    #[serde(default)]
    pub cache_read_input_tokens: Option<u32>,

    /// Thinking tokens used (for extended thinking/reasoning)
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<u32>,
}

impl Usage {
    /// Usage with only input/output token counts
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_tool_serialization() {
        let def = ToolDefinition::Custom(CustomTool {
            name: "agent".to_string(),
            description: None,
            input_schema: ToolInputSchema::new()
                .with_properties(json!({"prompt": {"type": "string"}}))
                .with_required(vec!["prompt".to_string()]),
        });

        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["name"], "agent");
        assert_eq!(value["input_schema"]["type"], "object");
        assert_eq!(value["input_schema"]["required"][0], "prompt");
        assert!(value.get("description").is_none());
        assert_eq!(def.name(), "agent");
    }

    #[test]
    fn test_usage_defaults_optional_counts() {
        let usage: Usage =
            serde_json::from_str(r#"{"input_tokens": 10, "output_tokens": 5}"#).unwrap();
        assert_eq!(usage, Usage::new(10, 5));
        assert!(usage.cache_read_input_tokens.is_none());
    }
}
