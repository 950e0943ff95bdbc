//! System prompt templates
//!
//! A template is plain text with `{{name}}` placeholders that are filled in
//! for the provider/model pair an agent runs on.

use async_trait::async_trait;
use regex::{Captures, Regex};

use crate::config::Config;
use crate::core::{AgentContext, FrameworkError, FrameworkResult};

/// Embedded template for delegated task agents
const TASK_TEMPLATE: &str = include_str!("templates/task.md");

/// Renders a system prompt for a provider/model pair
#[async_trait]
pub trait PromptBuilder: Send + Sync {
    /// Render the system prompt for `model` served by `provider`
    async fn build(
        &self,
        ctx: &AgentContext,
        provider: &str,
        model: &str,
        config: &Config,
    ) -> FrameworkResult<String>;
}

/// Placeholder-substituting prompt template
///
/// Supported placeholders: `provider`, `model`, `working_dir`, `date`,
/// `platform`. Anything else fails the build.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    template: String,
    working_dir: Option<String>,
    placeholder: Regex,
}

impl PromptTemplate {
    /// Create a template from text
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> FrameworkResult<Self> {
        let placeholder = Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}")
            .map_err(|e| FrameworkError::InvalidTemplate(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            template: template.into(),
            working_dir: None,
            placeholder,
        })
    }

    /// The built-in task agent template
    pub fn task() -> FrameworkResult<Self> {
        Self::new("task", TASK_TEMPLATE)
    }

    /// Render `working_dir` from this path instead of the config's
    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute every placeholder
    pub fn render(&self, provider: &str, model: &str, config: &Config) -> FrameworkResult<String> {
        let working_dir = self
            .working_dir
            .clone()
            .unwrap_or_else(|| config.working_dir());
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();

        let mut unknown: Option<String> = None;
        let rendered = self.placeholder.replace_all(&self.template, |caps: &Captures| {
            match &caps[1] {
                "provider" => provider.to_string(),
                "model" => model.to_string(),
                "working_dir" => working_dir.clone(),
                "date" => date.clone(),
                "platform" => std::env::consts::OS.to_string(),
                other => {
                    unknown.get_or_insert_with(|| other.to_string());
                    String::new()
                }
            }
        });

        if let Some(name) = unknown {
            return Err(FrameworkError::InvalidTemplate(format!(
                "template '{}' uses unknown placeholder '{}'",
                self.name, name
            )));
        }
        Ok(rendered.into_owned())
    }
}

#[async_trait]
impl PromptBuilder for PromptTemplate {
    async fn build(
        &self,
        ctx: &AgentContext,
        provider: &str,
        model: &str,
        config: &Config,
    ) -> FrameworkResult<String> {
        if ctx.is_cancelled() {
            return Err(FrameworkError::Interrupted);
        }
        let prompt = self.render(provider, model, config)?;
        tracing::debug!(
            "[PromptTemplate] Rendered '{}' for {}/{} ({} chars)",
            self.name,
            provider,
            model,
            prompt.len()
        );
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let template = PromptTemplate::new("t", "{{ model }} on {{provider}} in {{working_dir}}")
            .unwrap()
            .with_working_dir("/repo");

        let out = template.render("openai", "gpt-5", &Config::default()).unwrap();
        assert_eq!(out, "gpt-5 on openai in /repo");
    }

    #[test]
    fn test_working_dir_from_config() {
        let mut config = Config::default();
        config.working_dir = "/from/config".into();
        let template = PromptTemplate::new("t", "{{working_dir}}").unwrap();

        assert_eq!(template.render("p", "m", &config).unwrap(), "/from/config");
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let template = PromptTemplate::new("t", "hello {{user_name}}").unwrap();
        let err = template.render("p", "m", &Config::default()).unwrap_err();
        assert!(err.to_string().contains("user_name"));
    }

    #[test]
    fn test_task_template_renders() {
        let template = PromptTemplate::task().unwrap().with_working_dir("/repo");
        let out = template.render("anthropic", "claude", &Config::default()).unwrap();

        assert!(out.contains("Working directory: /repo"));
        assert!(out.contains("Model: claude (via anthropic)"));
        assert!(!out.contains("{{"));
    }

    #[tokio::test]
    async fn test_build_respects_cancellation() {
        let template = PromptTemplate::new("t", "x").unwrap();
        let ctx = AgentContext::default();
        ctx.cancel();

        let err = template
            .build(&ctx, "p", "m", &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::Interrupted));
    }
}
