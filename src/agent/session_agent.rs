//! Sub-agent runtime contract
//!
//! A `SessionAgent` runs a configured agent to completion against one prompt
//! inside a given session. The turn loop, tool calling and streaming all live
//! behind this trait; delegation only needs the final text and usage.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::core::AgentContext;
use crate::llm::Usage;
use crate::models::Model;
use crate::session::SessionService;
use crate::tools::ToolRegistry;

use super::params::RunParameters;

/// One run request for a session agent
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAgentCall {
    /// Session the run is recorded and billed in
    pub session_id: String,
    pub prompt: String,
    pub max_output_tokens: u32,
    pub provider_options: Map<String, Value>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<i64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
}

impl SessionAgentCall {
    /// Build a call from resolved run parameters
    pub fn new(
        session_id: impl Into<String>,
        prompt: impl Into<String>,
        params: RunParameters,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            prompt: prompt.into(),
            max_output_tokens: params.max_output_tokens,
            provider_options: params.provider_options,
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            frequency_penalty: params.frequency_penalty,
            presence_penalty: params.presence_penalty,
        }
    }
}

/// Final outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentResult {
    /// Text content of the agent's final response
    pub text: String,
    /// Usage accumulated over the run
    pub usage: Usage,
}

/// An agent bound to models, a system prompt and tools
///
/// The executing model is fixed when the agent is built from
/// `SessionAgentOptions::large_model`.
#[async_trait]
pub trait SessionAgent: Send + Sync {
    /// Run until the agent produces its final response
    ///
    /// Implementations record usage and cost on the call's session as they
    /// go, holding `SessionService::session_lock` for each cost update.
    async fn run(&self, ctx: &AgentContext, call: SessionAgentCall) -> anyhow::Result<AgentResult>;
}

/// Everything needed to construct a `SessionAgent`
#[derive(Clone)]
pub struct SessionAgentOptions {
    /// Model that executes turns
    pub large_model: Model,
    /// Model for auxiliary calls (titles, summaries)
    pub small_model: Model,
    /// Provider's system prompt prefix
    pub system_prompt_prefix: String,
    pub system_prompt: String,
    pub disable_auto_summarize: bool,
    /// Run tools without asking for permission
    pub is_yolo: bool,
    pub sessions: Arc<dyn SessionService>,
    pub tools: Arc<ToolRegistry>,
}

impl fmt::Debug for SessionAgentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionAgentOptions")
            .field("large_model", &self.large_model.model_id())
            .field("small_model", &self.small_model.model_id())
            .field(
                "system_prompt",
                &format!(
                    "{}...",
                    self.system_prompt.chars().take(50).collect::<String>()
                ),
            )
            .field("disable_auto_summarize", &self.disable_auto_summarize)
            .field("is_yolo", &self.is_yolo)
            .field("tools", &self.tools.tool_names())
            .finish()
    }
}

/// Constructs session agents
pub trait SessionAgentFactory: Send + Sync {
    fn build(&self, options: SessionAgentOptions) -> Arc<dyn SessionAgent>;
}
