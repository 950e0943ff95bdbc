//! Configuration types
//!
//! Providers, selected models, agent roles and runtime options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::models::{ModelInfo, ModelRole, SelectedModel};

/// Agent role ID for delegated task agents
pub const AGENT_TASK: &str = "task";

/// Wire protocol family spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openai-compat")]
    OpenAiCompat,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
}

/// Configuration for a single provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique identifier, referenced by `SelectedModel::provider`
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Text prepended to every system prompt sent through this provider
    #[serde(default)]
    pub system_prompt_prefix: String,

    /// Disabled providers are treated as not configured
    #[serde(default)]
    pub disabled: bool,

    /// Provider-specific request options
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub provider_options: Map<String, Value>,
}

impl ProviderConfig {
    /// Create a new provider configuration
    pub fn new(id: impl Into<String>, provider_type: ProviderType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider_type,
            base_url: None,
            api_key: None,
            system_prompt_prefix: String::new(),
            disabled: false,
            provider_options: Map::new(),
        }
    }

    /// Set the system prompt prefix
    pub fn with_system_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.system_prompt_prefix = prefix.into();
        self
    }

    /// Set whether this provider is disabled
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Add a provider option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.provider_options.insert(key.into(), value.into());
        self
    }
}

/// Configured providers keyed by ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Providers(HashMap<String, ProviderConfig>);

impl Providers {
    /// Look up an enabled provider
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.0.get(id).filter(|p| !p.disabled)
    }

    /// Insert or replace a provider, keyed by its ID
    pub fn insert(&mut self, provider: ProviderConfig) {
        self.0.insert(provider.id.clone(), provider);
    }

    /// Remove a provider
    pub fn remove(&mut self, id: &str) -> Option<ProviderConfig> {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &ProviderConfig)> {
        self.0.iter()
    }
}

/// Model selections for each role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectedModels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<SelectedModel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<SelectedModel>,
}

impl SelectedModels {
    /// Selection for a role
    pub fn get(&self, role: ModelRole) -> Option<&SelectedModel> {
        match role {
            ModelRole::Large => self.large.as_ref(),
            ModelRole::Small => self.small.as_ref(),
        }
    }
}

/// Configuration for an agent role (e.g., the task agent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRoleConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Model role the agent runs on by default
    #[serde(default = "default_agent_model")]
    pub model: ModelRole,

    /// Glob patterns of tool names available to the agent; `None` allows all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,

    #[serde(default)]
    pub disabled: bool,
}

fn default_agent_model() -> ModelRole {
    ModelRole::Large
}

impl AgentRoleConfig {
    /// Create a new agent role running on the large model with all tools
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            model: ModelRole::Large,
            allowed_tools: None,
            disabled: false,
        }
    }

    /// Restrict the agent to tools matching these glob patterns
    pub fn with_allowed_tools<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools = Some(patterns.into_iter().map(Into::into).collect());
        self
    }
}

/// Which configured roles fill the small-tier agent's model slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallTierRoles {
    /// Role of the model that executes the delegated task
    #[serde(default = "default_small_role")]
    pub primary: ModelRole,

    /// Role of the model used for the agent's auxiliary calls
    #[serde(default = "default_small_role")]
    pub auxiliary: ModelRole,
}

fn default_small_role() -> ModelRole {
    ModelRole::Small
}

impl Default for SmallTierRoles {
    fn default() -> Self {
        Self {
            primary: ModelRole::Small,
            auxiliary: ModelRole::Small,
        }
    }
}

/// Runtime options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Stop sub-agents from summarizing long conversations
    #[serde(default)]
    pub disable_auto_summarize: bool,

    /// Run sub-agent tools without asking for permission
    #[serde(default)]
    pub skip_permission_requests: bool,

    #[serde(default)]
    pub small_tier: SmallTierRoles,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Write to a daily-rolling file in this directory instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            directory: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Working directory rendered into system prompts
    #[serde(default)]
    pub working_dir: PathBuf,

    #[serde(default)]
    pub providers: Providers,

    /// Known models keyed by provider ID
    #[serde(default)]
    pub catalog: HashMap<String, Vec<ModelInfo>>,

    #[serde(default)]
    pub models: SelectedModels,

    #[serde(default)]
    pub agents: HashMap<String, AgentRoleConfig>,

    #[serde(default)]
    pub options: Options,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Working directory as a display string
    pub fn working_dir(&self) -> String {
        self.working_dir.display().to_string()
    }

    /// Catalog entry for a provider's model
    pub fn catalog_model(&self, provider: &str, model: &str) -> Option<&ModelInfo> {
        self.catalog
            .get(provider)
            .and_then(|models| models.iter().find(|m| m.id == model))
    }

    /// Enabled agent role by ID
    pub fn agent(&self, id: &str) -> Option<&AgentRoleConfig> {
        self.agents.get(id).filter(|a| !a.disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_provider_is_absent() {
        let mut providers = Providers::default();
        providers.insert(ProviderConfig::new("openai", ProviderType::OpenAi));
        providers.insert(ProviderConfig::new("local", ProviderType::OpenAiCompat).with_disabled(true));

        assert!(providers.get("openai").is_some());
        assert!(providers.get("local").is_none());
        assert!(providers.get("missing").is_none());
        assert_eq!(providers.len(), 2);
    }

    #[test]
    fn test_provider_type_names() {
        let provider: ProviderConfig =
            serde_json::from_str(r#"{"id": "compat", "type": "openai-compat"}"#).unwrap();
        assert_eq!(provider.provider_type, ProviderType::OpenAiCompat);
        assert!(!provider.disabled);
        assert!(provider.system_prompt_prefix.is_empty());
    }

    #[test]
    fn test_small_tier_roles_default_to_small() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options.small_tier.primary, ModelRole::Small);
        assert_eq!(options.small_tier.auxiliary, ModelRole::Small);

        let options: Options =
            serde_json::from_str(r#"{"small_tier": {"auxiliary": "large"}}"#).unwrap();
        assert_eq!(options.small_tier.primary, ModelRole::Small);
        assert_eq!(options.small_tier.auxiliary, ModelRole::Large);
    }

    #[test]
    fn test_catalog_lookup() {
        let mut config = Config::default();
        config
            .catalog
            .insert("openai".into(), vec![ModelInfo::new("gpt-5", 128_000)]);

        assert!(config.catalog_model("openai", "gpt-5").is_some());
        assert!(config.catalog_model("openai", "gpt-4").is_none());
        assert!(config.catalog_model("anthropic", "gpt-5").is_none());
    }

    #[test]
    fn test_disabled_agent_is_absent() {
        let mut config = Config::default();
        let mut task = AgentRoleConfig::new(AGENT_TASK);
        task.disabled = true;
        config.agents.insert(AGENT_TASK.into(), task);
        assert!(config.agent(AGENT_TASK).is_none());
    }
}
