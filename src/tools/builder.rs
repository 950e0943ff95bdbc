//! Tool set builder
//!
//! Assembles the tools a sub-agent may call, scoped by its agent role.

use async_trait::async_trait;
use glob::Pattern;
use std::sync::Arc;

use crate::config::AgentRoleConfig;
use crate::core::{AgentContext, FrameworkError, FrameworkResult};

use super::registry::ToolRegistry;

/// Builds the tool set for an agent role
#[async_trait]
pub trait ToolSetBuilder: Send + Sync {
    async fn build_tools(
        &self,
        ctx: &AgentContext,
        agent: &AgentRoleConfig,
    ) -> FrameworkResult<Arc<ToolRegistry>>;
}

/// Filters a base registry by the role's `allowed_tools` glob patterns
///
/// Excluded names are never handed out, whatever the patterns say.
pub struct RegistryToolSetBuilder {
    base: Arc<ToolRegistry>,
    excluded: Vec<String>,
}

impl RegistryToolSetBuilder {
    pub fn new(base: Arc<ToolRegistry>) -> Self {
        Self {
            base,
            excluded: Vec::new(),
        }
    }

    /// Never include the named tool
    pub fn excluding(mut self, name: impl Into<String>) -> Self {
        self.excluded.push(name.into());
        self
    }
}

#[async_trait]
impl ToolSetBuilder for RegistryToolSetBuilder {
    async fn build_tools(
        &self,
        ctx: &AgentContext,
        agent: &AgentRoleConfig,
    ) -> FrameworkResult<Arc<ToolRegistry>> {
        if ctx.is_cancelled() {
            return Err(FrameworkError::Interrupted);
        }

        let available = self
            .base
            .filtered(|name| !self.excluded.iter().any(|e| e == name));

        let Some(allowed) = &agent.allowed_tools else {
            return Ok(Arc::new(available));
        };

        let mut patterns = Vec::with_capacity(allowed.len());
        for raw in allowed {
            let pattern = Pattern::new(raw).map_err(|e| {
                FrameworkError::InvalidToolScope(format!("invalid tool pattern '{}': {}", raw, e))
            })?;
            if !available.tool_names().iter().any(|name| pattern.matches(name)) {
                return Err(FrameworkError::InvalidToolScope(format!(
                    "tool pattern '{}' for agent '{}' matches no tools",
                    raw, agent.id
                )));
            }
            patterns.push(pattern);
        }

        let scoped = available.filtered(|name| patterns.iter().any(|p| p.matches(name)));
        tracing::debug!(
            "[ToolSetBuilder] Agent '{}' gets {} of {} tools",
            agent.id,
            scoped.len(),
            self.base.len()
        );
        Ok(Arc::new(scoped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::registry::tests::EchoTool;

    fn base() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool("Read"));
        registry.register(EchoTool("Grep"));
        registry.register(EchoTool("GrepFiles"));
        registry.register(EchoTool("agent"));
        Arc::new(registry)
    }

    fn sorted(registry: &ToolRegistry) -> Vec<&str> {
        let mut names = registry.tool_names();
        names.sort_unstable();
        names
    }

    #[tokio::test]
    async fn test_all_tools_when_unrestricted() {
        let builder = RegistryToolSetBuilder::new(base()).excluding("agent");
        let tools = builder
            .build_tools(&AgentContext::default(), &AgentRoleConfig::new("task"))
            .await
            .unwrap();
        assert_eq!(sorted(&tools), vec!["Grep", "GrepFiles", "Read"]);
    }

    #[tokio::test]
    async fn test_glob_patterns_scope_tools() {
        let builder = RegistryToolSetBuilder::new(base()).excluding("agent");
        let agent = AgentRoleConfig::new("task").with_allowed_tools(["Grep*"]);
        let tools = builder
            .build_tools(&AgentContext::default(), &agent)
            .await
            .unwrap();
        assert_eq!(sorted(&tools), vec!["Grep", "GrepFiles"]);
    }

    #[tokio::test]
    async fn test_excluded_tool_never_granted() {
        let builder = RegistryToolSetBuilder::new(base()).excluding("agent");
        let agent = AgentRoleConfig::new("task").with_allowed_tools(["agent"]);
        let err = builder
            .build_tools(&AgentContext::default(), &agent)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, FrameworkError::InvalidToolScope(_)));
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_error() {
        let builder = RegistryToolSetBuilder::new(base());
        let agent = AgentRoleConfig::new("task").with_allowed_tools(["[unclosed"]);
        let err = builder
            .build_tools(&AgentContext::default(), &agent)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("invalid tool pattern"));
    }
}
