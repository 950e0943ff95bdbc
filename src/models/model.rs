//! Model types
//!
//! A `Model` pairs a catalog entry (what the model can do and what it costs)
//! with the user's selection for a role (which provider serves it and which
//! sampling parameters to use).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Catalog entry describing a model offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model ID as sent to the provider
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Output token limit used when the selection does not override it
    pub default_max_tokens: u32,

    /// Context window size in tokens
    #[serde(default)]
    pub context_window: u32,

    /// USD per million input tokens
    #[serde(default)]
    pub cost_per_1m_in: f64,

    /// USD per million output tokens
    #[serde(default)]
    pub cost_per_1m_out: f64,

    /// USD per million cache-creation input tokens
    #[serde(default)]
    pub cost_per_1m_in_cached: f64,

    /// USD per million cache-read input tokens
    #[serde(default)]
    pub cost_per_1m_out_cached: f64,

    /// Whether the model accepts reasoning controls
    #[serde(default)]
    pub can_reason: bool,

    /// Reasoning effort used when the selection does not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reasoning_effort: Option<String>,
}

impl ModelInfo {
    /// Create a catalog entry with no pricing
    pub fn new(id: impl Into<String>, default_max_tokens: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            default_max_tokens,
            context_window: 0,
            cost_per_1m_in: 0.0,
            cost_per_1m_out: 0.0,
            cost_per_1m_in_cached: 0.0,
            cost_per_1m_out_cached: 0.0,
            can_reason: false,
            default_reasoning_effort: None,
        }
    }

    /// Set input/output pricing (USD per million tokens)
    pub fn with_pricing(mut self, per_1m_in: f64, per_1m_out: f64) -> Self {
        self.cost_per_1m_in = per_1m_in;
        self.cost_per_1m_out = per_1m_out;
        self
    }

    /// Mark the model as reasoning-capable
    pub fn with_reasoning(mut self, default_effort: Option<&str>) -> Self {
        self.can_reason = true;
        self.default_reasoning_effort = default_effort.map(str::to_string);
        self
    }
}

/// User selection of a model for one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedModel {
    /// Model ID within the provider's catalog
    pub model: String,

    /// Provider ID serving the model
    pub provider: String,

    /// Output token override; 0 keeps the catalog default
    #[serde(default)]
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Reasoning effort for OpenAI-style providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,

    /// Enable extended thinking for Anthropic/Gemini-style providers
    #[serde(default)]
    pub think: bool,

    /// Provider-specific options overriding the provider's own
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub provider_options: Map<String, Value>,
}

impl SelectedModel {
    /// Select `model` from `provider` with default parameters
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            provider: provider.into(),
            max_tokens: 0,
            temperature: None,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            reasoning_effort: None,
            think: false,
            provider_options: Map::new(),
        }
    }

    /// Override the output token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A resolved model: catalog entry plus the selection that chose it
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Catalog entry
    pub info: ModelInfo,
    /// Selection for the role this model fills
    pub config: SelectedModel,
}

impl Model {
    pub fn new(info: ModelInfo, config: SelectedModel) -> Self {
        Self { info, config }
    }

    /// Provider ID serving this model
    pub fn provider_id(&self) -> &str {
        &self.config.provider
    }

    /// Model ID as sent to the provider
    pub fn model_id(&self) -> &str {
        &self.info.id
    }
}

/// Configured model slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Large,
    Small,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRole::Large => write!(f, "large"),
            ModelRole::Small => write!(f, "small"),
        }
    }
}

/// Execution tier requested for a delegated task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    /// Pre-built agent on the large model
    #[default]
    Large,
    /// Agent built per call for cheap, lightweight work
    Small,
}

impl Tier {
    /// Map the `use_small_model` flag to a tier
    pub fn from_flag(use_small_model: bool) -> Self {
        if use_small_model {
            Tier::Small
        } else {
            Tier::Large
        }
    }

    pub fn is_small(self) -> bool {
        matches!(self, Tier::Small)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Large => write!(f, "large"),
            Tier::Small => write!(f, "small"),
        }
    }
}
