//! Session management for delegated work
//!
//! This module provides `Session` records, their on-disk `SessionStorage`,
//! and the `SessionService` registry contract used by the delegation tool.
//!
//! Task sessions are linked to their parent; a child's ID is derived from the
//! parent message and tool call that spawned it.

pub mod id;
pub mod registry;
pub mod session;
pub mod storage;

pub use id::{agent_tool_session_id, is_agent_tool_session, parse_agent_tool_session_id};
pub use registry::{FileSessionRegistry, SessionService};
pub use session::{usage_cost, Session};
pub use storage::SessionStorage;
