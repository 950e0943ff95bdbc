//! Sub-agent delegation for agent frameworks
//!
//! The `agent` tool lets a primary agent hand a self-contained task to a
//! nested agent running in its own child session. The child's answer comes
//! back as the tool result and its cost is rolled into the parent session.

pub mod core;
pub mod config;
pub mod session;
pub mod tools;

// Model catalog and tier resolution
pub mod models;
pub mod prompt;
pub mod llm;
pub mod logging;

// Sub-agent runtime contract
pub mod agent;

pub use crate::core::{AgentContext, FrameworkError, FrameworkResult};
pub use tools::{AgentParams, AgentTool, AgentToolServices, DelegationOutcome};
