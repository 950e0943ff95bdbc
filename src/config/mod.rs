//! Configuration for delegation
//!
//! This module provides:
//! - `Config` - Providers, model catalog, selected models, agent roles, options
//! - `ProviderConfig` / `Providers` - Provider lookup (disabled means absent)
//! - `AgentRoleConfig` - Tool scope and model role of an agent
//! - `LoggingConfig` - Subscriber settings used by `logging::init_logging`

mod loader;
mod types;

pub use types::{
    AgentRoleConfig, Config, LoggingConfig, Options, ProviderConfig, ProviderType, Providers,
    SelectedModels, SmallTierRoles, AGENT_TASK,
};
