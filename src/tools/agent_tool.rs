//! Agent tool for delegating sub-tasks
//!
//! Spawns a nested agent in a child session, runs it to completion against
//! the given prompt and returns its final text. The child's cost is added to
//! the calling session.
//!
//! Two tiers are available. The large tier's agent is built once when the
//! tool is constructed and reused by every call. The small tier rebuilds
//! models, system prompt and tools on every call.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::builder::ToolSetBuilder;
use super::tool::{Tool, ToolInfo, ToolResult};
use crate::agent::{
    RunParameters, SessionAgent, SessionAgentCall, SessionAgentFactory, SessionAgentOptions,
};
use crate::config::{AgentRoleConfig, Config, ProviderConfig, AGENT_TASK};
use crate::core::{AgentContext, FrameworkError, FrameworkResult};
use crate::llm::{CustomTool, ToolDefinition, ToolInputSchema};
use crate::models::{Model, ModelResolver, Tier};
use crate::prompt::PromptBuilder;
use crate::session::SessionService;

/// Name the delegation tool is registered under
pub const AGENT_TOOL_NAME: &str = "agent";

/// Title given to every child session
pub const TASK_SESSION_TITLE: &str = "New Agent Session";

const DESCRIPTION: &str = include_str!("templates/agent_tool.md");

/// Input for the agent tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentParams {
    /// The task for the agent to perform
    #[serde(default)]
    pub prompt: String,

    /// Run on the small model for faster/cheaper execution
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub use_small_model: bool,
}

/// Outcome of a delegation that did not hit a hard error
#[derive(Debug, Clone, PartialEq)]
pub enum DelegationOutcome {
    /// The sub-agent's final response text
    Completed(String),
    /// A failure the calling agent sees and can react to
    Failed(String),
}

/// Collaborators the agent tool drives
#[derive(Clone)]
pub struct AgentToolServices {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionService>,
    pub models: Arc<dyn ModelResolver>,
    pub prompts: Arc<dyn PromptBuilder>,
    pub tools: Arc<dyn ToolSetBuilder>,
    pub agents: Arc<dyn SessionAgentFactory>,
}

/// Everything a tier needs to run: agent, executing model and its provider
struct TierBundle {
    tier: Tier,
    agent: Arc<dyn SessionAgent>,
    model: Model,
    provider: ProviderConfig,
}

/// Delegates a task to a nested agent
pub struct AgentTool {
    services: AgentToolServices,
    agent_config: AgentRoleConfig,
    large: TierBundle,
}

impl AgentTool {
    /// Create the tool and pre-build the large-tier agent
    pub async fn new(ctx: &AgentContext, services: AgentToolServices) -> FrameworkResult<Self> {
        let agent_config = services
            .config
            .agent(AGENT_TASK)
            .cloned()
            .ok_or_else(|| FrameworkError::AgentNotConfigured(AGENT_TASK.to_string()))?;

        let large = build_bundle(&services, &agent_config, ctx, Tier::Large).await?;
        tracing::info!(
            "[AgentTool] Large tier ready: {}/{}",
            large.model.provider_id(),
            large.model.model_id()
        );

        Ok(Self {
            services,
            agent_config,
            large,
        })
    }

    /// Run one delegation
    ///
    /// Invalid input and sub-agent failures come back as
    /// `DelegationOutcome::Failed`. Everything else that goes wrong is a hard
    /// error.
    pub async fn delegate(
        &self,
        ctx: &AgentContext,
        params: &AgentParams,
    ) -> FrameworkResult<DelegationOutcome> {
        if params.prompt.is_empty() {
            return Ok(DelegationOutcome::Failed("prompt is required".to_string()));
        }

        let parent_id = ctx.session_id().ok_or(FrameworkError::MissingSessionId)?;
        let message_id = ctx.message_id().ok_or(FrameworkError::MissingMessageId)?;
        let call_id = ctx.tool_use_id().ok_or(FrameworkError::MissingToolCallId)?;

        let small;
        let bundle = match Tier::from_flag(params.use_small_model) {
            Tier::Large => &self.large,
            Tier::Small => {
                small = build_bundle(&self.services, &self.agent_config, ctx, Tier::Small).await?;
                &small
            }
        };

        let sessions = &self.services.sessions;
        let child_id = sessions.agent_tool_session_id(message_id, call_id)?;
        let child = ctx
            .try_cancellable(sessions.create_task_session(ctx, &child_id, parent_id, TASK_SESSION_TITLE))
            .await
            .map_err(|e| keep_interrupt(e, |e| FrameworkError::SessionCreation(Box::new(e))))?;

        tracing::info!(
            "[AgentTool] Delegating to {} tier ({}/{}) in session {}",
            bundle.tier,
            bundle.model.provider_id(),
            bundle.model.model_id(),
            child.id
        );

        let call = SessionAgentCall::new(
            child.id.clone(),
            params.prompt.clone(),
            RunParameters::resolve(&bundle.model, &bundle.provider),
        );
        let sub_ctx = ctx.new_subagent(child.id.clone(), AGENT_TASK);
        let result = match ctx.cancellable(bundle.agent.run(&sub_ctx, call)).await? {
            Ok(result) => result,
            Err(_) if ctx.is_cancelled() => return Err(FrameworkError::Interrupted),
            Err(e) => {
                tracing::warn!("[AgentTool] Sub-agent in {} failed: {:#}", child.id, e);
                return Ok(DelegationOutcome::Failed(
                    "error generating response".to_string(),
                ));
            }
        };

        self.roll_up_cost(ctx, &child.id, parent_id).await?;
        Ok(DelegationOutcome::Completed(result.text))
    }

    /// Add the child's final cost to the parent
    ///
    /// Both sessions are read fresh under the parent's lock.
    async fn roll_up_cost(
        &self,
        ctx: &AgentContext,
        child_id: &str,
        parent_id: &str,
    ) -> FrameworkResult<()> {
        let sessions = &self.services.sessions;
        let lock = sessions.session_lock(parent_id);
        let _guard = ctx.cancellable(lock.lock()).await?;

        let child = ctx
            .try_cancellable(sessions.get(ctx, child_id))
            .await
            .map_err(|e| keep_interrupt(e, |e| session_read("session", e)))?;
        let mut parent = ctx
            .try_cancellable(sessions.get(ctx, parent_id))
            .await
            .map_err(|e| keep_interrupt(e, |e| session_read("parent session", e)))?;

        parent.cost += child.cost;
        let saved = ctx
            .try_cancellable(sessions.save(ctx, parent))
            .await
            .map_err(|e| keep_interrupt(e, |e| FrameworkError::SessionSave(Box::new(e))))?;

        tracing::debug!(
            "[AgentTool] Rolled {:.6} from {} into {} (now {:.6})",
            child.cost,
            child_id,
            parent_id,
            saved.cost
        );
        Ok(())
    }
}

/// Resolve models, provider, system prompt and tools for a tier
async fn build_bundle(
    services: &AgentToolServices,
    agent_config: &AgentRoleConfig,
    ctx: &AgentContext,
    tier: Tier,
) -> FrameworkResult<TierBundle> {
    let models = ctx
        .try_cancellable(services.models.resolve_models(ctx, tier))
        .await
        .map_err(|e| keep_interrupt(e, |e| FrameworkError::ModelResolution(Box::new(e))))?;
    let model = models.primary.clone();

    let system_prompt = ctx
        .try_cancellable(services.prompts.build(
            ctx,
            model.provider_id(),
            model.model_id(),
            &services.config,
        ))
        .await
        .map_err(|e| keep_interrupt(e, |e| FrameworkError::PromptBuild(Box::new(e))))?;

    let provider = services
        .models
        .provider_config(model.provider_id())
        .ok_or_else(|| FrameworkError::provider_not_configured(model.provider_id(), tier.is_small()))?;

    let tools = ctx
        .try_cancellable(services.tools.build_tools(ctx, agent_config))
        .await
        .map_err(|e| keep_interrupt(e, |e| FrameworkError::ToolBuild(Box::new(e))))?;

    let agent = services.agents.build(SessionAgentOptions {
        large_model: models.primary,
        small_model: models.auxiliary,
        system_prompt_prefix: provider.system_prompt_prefix.clone(),
        system_prompt,
        disable_auto_summarize: services.config.options.disable_auto_summarize,
        is_yolo: services.config.options.skip_permission_requests,
        sessions: services.sessions.clone(),
        tools,
    });

    Ok(TierBundle {
        tier,
        agent,
        model,
        provider,
    })
}

/// Apply `wrap` unless the error is a cancellation
fn keep_interrupt(
    err: FrameworkError,
    wrap: impl FnOnce(FrameworkError) -> FrameworkError,
) -> FrameworkError {
    if matches!(err, FrameworkError::Interrupted) {
        err
    } else {
        wrap(err)
    }
}

fn session_read(label: &'static str, source: FrameworkError) -> FrameworkError {
    FrameworkError::SessionRead {
        label,
        source: Box::new(source),
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        AGENT_TOOL_NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::Custom(CustomTool {
            name: AGENT_TOOL_NAME.to_string(),
            description: Some(DESCRIPTION.to_string()),
            input_schema: ToolInputSchema::new()
                .with_properties(json!({
                    "prompt": {
                        "type": "string",
                        "description": "The task for the agent to perform"
                    },
                    "use_small_model": {
                        "type": "boolean",
                        "description": "If true, use the small model for faster/cheaper execution (good for simple searches or lightweight tasks)"
                    }
                }))
                .with_required(vec!["prompt".to_string()]),
        })
    }

    fn get_info(&self, input: &Value) -> ToolInfo {
        let params: AgentParams = serde_json::from_value(input.clone()).unwrap_or_default();
        let tier = Tier::from_flag(params.use_small_model);
        let preview: String = params.prompt.chars().take(100).collect();

        ToolInfo {
            name: AGENT_TOOL_NAME.to_string(),
            action_description: format!("Delegate task to sub-agent ({} model)", tier),
            details: (!preview.is_empty()).then_some(preview),
        }
    }

    async fn execute(&self, input: &Value, ctx: &AgentContext) -> Result<ToolResult> {
        let params: AgentParams = match serde_json::from_value(input.clone()) {
            Ok(params) => params,
            Err(e) => return Ok(ToolResult::error(format!("invalid parameters: {}", e))),
        };

        match self.delegate(ctx, &params).await? {
            DelegationOutcome::Completed(text) => Ok(ToolResult::success(text)),
            DelegationOutcome::Failed(message) => Ok(ToolResult::error(message)),
        }
    }

    fn requires_permission(&self) -> bool {
        false
    }
}
