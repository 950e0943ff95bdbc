//! Sub-agent execution
//!
//! - `SessionAgent` / `SessionAgentFactory` - Runtime that executes a delegated task
//! - `SessionAgentCall` / `AgentResult` - One run's request and outcome
//! - `RunParameters` - Effective sampling parameters for the executing model

pub mod params;
pub mod session_agent;

pub use params::{max_output_tokens, provider_options, RunParameters};
pub use session_agent::{
    AgentResult, SessionAgent, SessionAgentCall, SessionAgentFactory, SessionAgentOptions,
};
