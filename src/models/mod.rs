//! Models and tier resolution
//!
//! - `ModelInfo` - Catalog entry (limits, pricing, reasoning support)
//! - `SelectedModel` - User selection for a role
//! - `Model` - Resolved pair of the two
//! - `Tier` / `ModelRole` - Delegation tier and configured model slot
//! - `ModelResolver` - Trait mapping a tier to concrete models

mod model;
mod resolver;

pub use model::{Model, ModelInfo, ModelRole, SelectedModel, Tier};
pub use resolver::{ConfigModelResolver, ModelResolver, TierModels};
