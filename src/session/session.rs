//! Session record
//!
//! A `Session` is one unit of conversational or task state. Sessions form a
//! parent/child tree for delegated work; each carries its own accumulated
//! cost, which a completed child rolls up into its parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::Usage;
use crate::models::ModelInfo;

/// Persisted session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    // --- Identity ---
    /// Unique session ID
    pub id: String,

    /// Display label
    pub title: String,

    // --- Lineage ---
    /// Parent session ID (if this is a task session)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_session_id: Option<String>,

    /// The tool call that spawned this session (if task session)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_tool_use_id: Option<String>,

    /// Task sessions spawned from this session
    #[serde(default)]
    pub child_session_ids: Vec<String>,

    // --- Accounting ---
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub completion_tokens: u64,

    /// Accumulated cost in USD
    #[serde(default)]
    pub cost: f64,

    // --- Timestamps ---
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a root session
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            parent_session_id: None,
            parent_tool_use_id: None,
            child_session_ids: Vec::new(),
            prompt_tokens: 0,
            completion_tokens: 0,
            cost: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a task session linked to `parent_session_id`
    pub fn new_task(
        id: impl Into<String>,
        parent_session_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let mut session = Self::new(id, title);
        session.parent_session_id = Some(parent_session_id.into());
        session
    }

    /// Check if this is a task session
    pub fn is_task(&self) -> bool {
        self.parent_session_id.is_some()
    }

    /// Update the updated_at timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Add a child session ID
    pub fn add_child(&mut self, child_session_id: impl Into<String>) {
        let child = child_session_id.into();
        if !self.child_session_ids.contains(&child) {
            self.child_session_ids.push(child);
        }
        self.touch();
    }

    /// Record one model call's usage and return the cost it added
    pub fn apply_usage(&mut self, model: &ModelInfo, usage: &Usage) -> f64 {
        let delta = usage_cost(model, usage);
        self.prompt_tokens += u64::from(usage.input_tokens)
            + u64::from(usage.cache_creation_input_tokens.unwrap_or(0));
        self.completion_tokens += u64::from(usage.output_tokens);
        self.cost += delta;
        self.touch();
        delta
    }
}

/// Cost in USD of one model call
pub fn usage_cost(model: &ModelInfo, usage: &Usage) -> f64 {
    let per_token = |per_1m: f64, tokens: u32| per_1m / 1e6 * f64::from(tokens);

    per_token(model.cost_per_1m_in, usage.input_tokens)
        + per_token(model.cost_per_1m_out, usage.output_tokens)
        + per_token(
            model.cost_per_1m_in_cached,
            usage.cache_creation_input_tokens.unwrap_or(0),
        )
        + per_token(
            model.cost_per_1m_out_cached,
            usage.cache_read_input_tokens.unwrap_or(0),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_session() {
        let session = Session::new("session_123", "Main");
        assert_eq!(session.id, "session_123");
        assert!(!session.is_task());
        assert_eq!(session.cost, 0.0);
        assert!(session.child_session_ids.is_empty());
    }

    #[test]
    fn test_task_session() {
        let session = Session::new_task("sub_123", "parent_456", "New Agent Session");
        assert!(session.is_task());
        assert_eq!(session.parent_session_id.as_deref(), Some("parent_456"));
    }

    #[test]
    fn test_add_child_is_idempotent() {
        let mut session = Session::new("s", "t");
        session.add_child("child_1");
        session.add_child("child_2");
        session.add_child("child_1");
        assert_eq!(session.child_session_ids, vec!["child_1", "child_2"]);
    }

    #[test]
    fn test_apply_usage() {
        let model = ModelInfo::new("m", 1000).with_pricing(3.0, 15.0);
        let mut session = Session::new("s", "t");

        let delta = session.apply_usage(&model, &Usage::new(1_000_000, 100_000));
        assert!((delta - 4.5).abs() < 1e-9);
        assert!((session.cost - 4.5).abs() < 1e-9);
        assert_eq!(session.prompt_tokens, 1_000_000);
        assert_eq!(session.completion_tokens, 100_000);

        session.apply_usage(&model, &Usage::new(0, 200_000));
        assert!((session.cost - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_usage_cost_includes_cache_pricing() {
        let mut model = ModelInfo::new("m", 1000);
        model.cost_per_1m_in_cached = 2.0;
        model.cost_per_1m_out_cached = 0.5;
        let usage = Usage {
            cache_creation_input_tokens: Some(500_000),
            cache_read_input_tokens: Some(2_000_000),
            ..Usage::default()
        };
        assert!((usage_cost(&model, &usage) - 2.0).abs() < 1e-9);
    }
}
