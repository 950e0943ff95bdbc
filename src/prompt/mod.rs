//! System prompt rendering
//!
//! - `PromptBuilder` - Trait rendering a system prompt for a provider/model
//! - `PromptTemplate` - Placeholder template, including the built-in task template

mod template;

pub use template::{PromptBuilder, PromptTemplate};
