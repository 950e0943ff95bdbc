//! Configuration file loading and validation

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::{FrameworkError, FrameworkResult};
use crate::models::ModelRole;

use super::types::Config;

impl Config {
    /// Load configuration from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> FrameworkResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;

        tracing::info!(
            "[Config] Loaded {} with {} providers and {} agents",
            path.display(),
            config.providers.len(),
            config.agents.len()
        );
        Ok(config)
    }

    /// Parse configuration from a JSON string and validate it
    pub fn from_json_str(json: &str) -> FrameworkResult<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    ///
    /// Selected models must name a catalog entry, and provider map keys must
    /// match the IDs inside. A selection whose provider is missing passes:
    /// that is reported when the model is used, never papered over here.
    pub fn validate(&self) -> FrameworkResult<()> {
        for (key, provider) in self.providers.iter() {
            if key != &provider.id {
                return Err(FrameworkError::InvalidConfig(format!(
                    "provider key '{}' does not match id '{}'",
                    key, provider.id
                )));
            }
        }

        for role in [ModelRole::Large, ModelRole::Small] {
            if let Some(selected) = self.models.get(role) {
                if self.catalog_model(&selected.provider, &selected.model).is_none() {
                    return Err(FrameworkError::InvalidConfig(format!(
                        "{} model '{}' is not in the catalog of provider '{}'",
                        role, selected.model, selected.provider
                    )));
                }
            }
        }

        for (key, agent) in &self.agents {
            if key != &agent.id {
                return Err(FrameworkError::InvalidConfig(format!(
                    "agent key '{}' does not match id '{}'",
                    key, agent.id
                )));
            }
        }

        Ok(())
    }
}
