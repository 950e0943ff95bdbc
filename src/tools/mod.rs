//! Tool system
//!
//! This module provides:
//! - `Tool` trait - Interface for implementing tools
//! - `ToolResult` - Result type for tool execution
//! - `ToolRegistry` - Registry for managing available tools
//! - `ToolSetBuilder` - Scopes a registry to an agent role
//! - `AgentTool` - Delegates a sub-task to a nested agent

pub mod agent_tool;
mod builder;
mod registry;
mod tool;

pub use agent_tool::{
    AgentParams, AgentTool, AgentToolServices, DelegationOutcome, AGENT_TOOL_NAME,
    TASK_SESSION_TITLE,
};
pub use builder::{RegistryToolSetBuilder, ToolSetBuilder};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolInfo, ToolResult};
