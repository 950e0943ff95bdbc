//! Wire-neutral LLM types shared by tools and sub-agent runtimes

pub mod types;

pub use types::{CustomTool, ToolDefinition, ToolInputSchema, Usage};
