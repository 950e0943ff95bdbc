//! Model resolution
//!
//! Maps an execution tier to the concrete models that fill an agent's two
//! slots, and exposes provider configuration lookup.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, ProviderConfig};
use crate::core::{AgentContext, FrameworkError, FrameworkResult};

use super::model::{Model, ModelRole, Tier};

/// Models filling an agent's slots for one tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierModels {
    /// Model that executes the task
    pub primary: Model,
    /// Model used for the agent's auxiliary calls (titles, summaries)
    pub auxiliary: Model,
}

/// Resolves configured models for a tier
#[async_trait]
pub trait ModelResolver: Send + Sync {
    /// Resolve the primary and auxiliary models for `tier`
    async fn resolve_models(&self, ctx: &AgentContext, tier: Tier) -> FrameworkResult<TierModels>;

    /// Look up a provider's configuration; `None` when it is not configured
    fn provider_config(&self, provider_id: &str) -> Option<ProviderConfig>;
}

/// `ModelResolver` backed by a loaded `Config`
///
/// The large tier uses the `large` role for its primary slot and `small` for
/// its auxiliary slot. The small tier takes both roles from
/// `options.small_tier`.
#[derive(Debug, Clone)]
pub struct ConfigModelResolver {
    config: Arc<Config>,
}

impl ConfigModelResolver {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Roles filling (primary, auxiliary) for a tier
    pub fn roles_for(&self, tier: Tier) -> (ModelRole, ModelRole) {
        match tier {
            Tier::Large => (ModelRole::Large, ModelRole::Small),
            Tier::Small => {
                let roles = self.config.options.small_tier;
                (roles.primary, roles.auxiliary)
            }
        }
    }

    fn resolve_role(&self, role: ModelRole) -> FrameworkResult<Model> {
        let selected = self.config.models.get(role).ok_or_else(|| {
            FrameworkError::InvalidConfig(format!("no {} model selected", role))
        })?;

        let info = self
            .config
            .catalog_model(&selected.provider, &selected.model)
            .ok_or_else(|| FrameworkError::ModelNotFound {
                provider: selected.provider.clone(),
                model: selected.model.clone(),
            })?;

        Ok(Model::new(info.clone(), selected.clone()))
    }
}

#[async_trait]
impl ModelResolver for ConfigModelResolver {
    async fn resolve_models(&self, ctx: &AgentContext, tier: Tier) -> FrameworkResult<TierModels> {
        if ctx.is_cancelled() {
            return Err(FrameworkError::Interrupted);
        }

        let (primary_role, auxiliary_role) = self.roles_for(tier);
        let primary = self.resolve_role(primary_role)?;
        let auxiliary = self.resolve_role(auxiliary_role)?;

        tracing::debug!(
            "[ModelResolver] {} tier -> primary {}/{}, auxiliary {}/{}",
            tier,
            primary.provider_id(),
            primary.model_id(),
            auxiliary.provider_id(),
            auxiliary.model_id()
        );

        Ok(TierModels { primary, auxiliary })
    }

    fn provider_config(&self, provider_id: &str) -> Option<ProviderConfig> {
        self.config.providers.get(provider_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderType, SmallTierRoles};
    use crate::models::{ModelInfo, SelectedModel};

    fn config() -> Config {
        let mut config = Config::default();
        config.providers.insert(ProviderConfig::new("openai", ProviderType::OpenAi));
        config.catalog.insert(
            "openai".into(),
            vec![ModelInfo::new("gpt-5", 128_000), ModelInfo::new("gpt-5-mini", 64_000)],
        );
        config.models.large = Some(SelectedModel::new("openai", "gpt-5"));
        config.models.small = Some(SelectedModel::new("openai", "gpt-5-mini"));
        config
    }

    #[tokio::test]
    async fn test_large_tier_uses_large_then_small() {
        let resolver = ConfigModelResolver::new(Arc::new(config()));
        let models = resolver
            .resolve_models(&AgentContext::default(), Tier::Large)
            .await
            .unwrap();

        assert_eq!(models.primary.model_id(), "gpt-5");
        assert_eq!(models.auxiliary.model_id(), "gpt-5-mini");
    }

    #[tokio::test]
    async fn test_small_tier_defaults_to_small_for_both_slots() {
        let resolver = ConfigModelResolver::new(Arc::new(config()));
        let models = resolver
            .resolve_models(&AgentContext::default(), Tier::Small)
            .await
            .unwrap();

        assert_eq!(models.primary.model_id(), "gpt-5-mini");
        assert_eq!(models.auxiliary.model_id(), "gpt-5-mini");
    }

    #[tokio::test]
    async fn test_small_tier_roles_are_configurable() {
        let mut config = config();
        config.options.small_tier = SmallTierRoles {
            primary: ModelRole::Small,
            auxiliary: ModelRole::Large,
        };
        let resolver = ConfigModelResolver::new(Arc::new(config));
        let models = resolver
            .resolve_models(&AgentContext::default(), Tier::Small)
            .await
            .unwrap();

        assert_eq!(models.primary.model_id(), "gpt-5-mini");
        assert_eq!(models.auxiliary.model_id(), "gpt-5");
    }

    #[tokio::test]
    async fn test_missing_selection_is_error() {
        let mut config = config();
        config.models.small = None;
        let resolver = ConfigModelResolver::new(Arc::new(config));

        let err = resolver
            .resolve_models(&AgentContext::default(), Tier::Small)
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts() {
        let resolver = ConfigModelResolver::new(Arc::new(config()));
        let ctx = AgentContext::default();
        ctx.cancel();

        let err = resolver.resolve_models(&ctx, Tier::Large).await.unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_provider_config_lookup_never_falls_back() {
        let resolver = ConfigModelResolver::new(Arc::new(config()));
        assert!(resolver.provider_config("openai").is_some());
        assert!(resolver.provider_config("anthropic").is_none());
    }
}
