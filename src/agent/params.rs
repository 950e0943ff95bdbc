//! Run parameters
//!
//! Sampling and generation parameters for a run, derived from the executing
//! model's selection and its provider.

use serde_json::{json, Map, Value};

use crate::config::{ProviderConfig, ProviderType};
use crate::models::Model;

/// Effective parameters for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub max_output_tokens: u32,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<i64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub provider_options: Map<String, Value>,
}

impl RunParameters {
    /// Resolve parameters for `model` served through `provider`
    pub fn resolve(model: &Model, provider: &ProviderConfig) -> Self {
        let selected = &model.config;
        Self {
            max_output_tokens: max_output_tokens(model.info.default_max_tokens, selected.max_tokens),
            temperature: selected.temperature,
            top_p: selected.top_p,
            top_k: selected.top_k,
            frequency_penalty: selected.frequency_penalty,
            presence_penalty: selected.presence_penalty,
            provider_options: provider_options(model, provider),
        }
    }
}

/// The override wins only when non-zero
pub fn max_output_tokens(catalog_default: u32, override_tokens: u32) -> u32 {
    if override_tokens != 0 {
        override_tokens
    } else {
        catalog_default
    }
}

/// Merge provider options for a run
///
/// Model options override provider options key by key. Reasoning controls
/// are added for reasoning-capable models unless already set explicitly.
pub fn provider_options(model: &Model, provider: &ProviderConfig) -> Map<String, Value> {
    let mut options = provider.provider_options.clone();
    for (key, value) in &model.config.provider_options {
        options.insert(key.clone(), value.clone());
    }

    if !model.info.can_reason {
        return options;
    }

    match provider.provider_type {
        ProviderType::OpenAi | ProviderType::OpenAiCompat | ProviderType::OpenRouter => {
            let effort = model
                .config
                .reasoning_effort
                .clone()
                .or_else(|| model.info.default_reasoning_effort.clone());
            if let Some(effort) = effort {
                options
                    .entry("reasoning_effort")
                    .or_insert_with(|| Value::String(effort));
            }
        }
        ProviderType::Anthropic => {
            if model.config.think {
                options
                    .entry("thinking")
                    .or_insert_with(|| json!({"type": "enabled"}));
            }
        }
        ProviderType::Gemini => {
            if model.config.think {
                options
                    .entry("thinking_config")
                    .or_insert_with(|| json!({"include_thoughts": true}));
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelInfo, SelectedModel};

    fn model(info: ModelInfo, selected: SelectedModel) -> Model {
        Model::new(info, selected)
    }

    #[test]
    fn test_max_output_tokens_override_wins_when_non_zero() {
        assert_eq!(max_output_tokens(8192, 0), 8192);
        assert_eq!(max_output_tokens(8192, 1024), 1024);
        assert_eq!(max_output_tokens(0, 0), 0);
    }

    #[test]
    fn test_resolve_copies_sampling_verbatim() {
        let mut selected = SelectedModel::new("openai", "gpt-5").with_temperature(0.3);
        selected.top_p = Some(0.9);
        selected.top_k = Some(40);
        selected.frequency_penalty = Some(0.1);
        selected.presence_penalty = Some(-0.2);
        let m = model(ModelInfo::new("gpt-5", 128_000), selected);
        let provider = ProviderConfig::new("openai", ProviderType::OpenAi);

        let params = RunParameters::resolve(&m, &provider);
        assert_eq!(params.max_output_tokens, 128_000);
        assert_eq!(params.temperature, Some(0.3));
        assert_eq!(params.top_p, Some(0.9));
        assert_eq!(params.top_k, Some(40));
        assert_eq!(params.frequency_penalty, Some(0.1));
        assert_eq!(params.presence_penalty, Some(-0.2));
        assert!(params.provider_options.is_empty());
    }

    #[test]
    fn test_model_options_override_provider_options() {
        let mut selected = SelectedModel::new("p", "m");
        selected.provider_options.insert("store".into(), json!(false));
        let m = model(ModelInfo::new("m", 1000), selected);
        let provider = ProviderConfig::new("p", ProviderType::OpenAiCompat)
            .with_option("store", true)
            .with_option("user", "abc");

        let options = provider_options(&m, &provider);
        assert_eq!(options["store"], json!(false));
        assert_eq!(options["user"], json!("abc"));
    }

    #[test]
    fn test_reasoning_effort_for_openai() {
        let info = ModelInfo::new("o4", 1000).with_reasoning(Some("medium"));
        let provider = ProviderConfig::new("openai", ProviderType::OpenAi);

        let default_effort = model(info.clone(), SelectedModel::new("openai", "o4"));
        assert_eq!(
            provider_options(&default_effort, &provider)["reasoning_effort"],
            json!("medium")
        );

        let mut selected = SelectedModel::new("openai", "o4");
        selected.reasoning_effort = Some("high".into());
        let explicit = model(info, selected);
        assert_eq!(
            provider_options(&explicit, &provider)["reasoning_effort"],
            json!("high")
        );
    }

    #[test]
    fn test_thinking_only_when_enabled_and_supported() {
        let provider = ProviderConfig::new("anthropic", ProviderType::Anthropic);
        let mut selected = SelectedModel::new("anthropic", "claude");
        selected.think = true;

        let capable = model(ModelInfo::new("claude", 1000).with_reasoning(None), selected.clone());
        assert_eq!(
            provider_options(&capable, &provider)["thinking"],
            json!({"type": "enabled"})
        );

        let incapable = model(ModelInfo::new("claude", 1000), selected);
        assert!(provider_options(&incapable, &provider).is_empty());

        let gemini = ProviderConfig::new("gemini", ProviderType::Gemini);
        let mut selected = SelectedModel::new("gemini", "flash");
        selected.think = true;
        let m = model(ModelInfo::new("flash", 1000).with_reasoning(None), selected);
        assert!(provider_options(&m, &gemini).contains_key("thinking_config"));
    }
}
