//! Core types for the delegation framework
//!
//! This module provides the fundamental types used throughout the framework:
//! - `AgentContext` - Invocation identity and cancellation passed to tools
//! - `FrameworkError` - Hard error types

pub mod context;
pub mod error;

pub use context::AgentContext;
pub use error::{FrameworkError, FrameworkResult};
