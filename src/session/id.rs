//! Agent-tool session IDs
//!
//! A delegated task's session ID is derived from the assistant message that
//! issued the tool call and the call's own ID. The same pair always yields
//! the same ID, and the ID can be split back into its parts.

use crate::core::{FrameworkError, FrameworkResult};

const SEPARATOR: &str = "$$";

/// Derive the child session ID for a tool call
///
/// Neither part may contain `$$`, and the separator may not be extended by a
/// `$` at the join: `("m$$x", "c")` and `("m", "x$$c")` would otherwise map
/// to the same child.
pub fn agent_tool_session_id(message_id: &str, call_id: &str) -> FrameworkResult<String> {
    if message_id.contains(SEPARATOR)
        || call_id.contains(SEPARATOR)
        || message_id.ends_with('$')
        || call_id.starts_with('$')
    {
        return Err(FrameworkError::AmbiguousToolSessionId {
            message_id: message_id.to_string(),
            call_id: call_id.to_string(),
        });
    }
    Ok(format!("{}{}{}", message_id, SEPARATOR, call_id))
}

/// Whether `session_id` was derived by `agent_tool_session_id`
pub fn is_agent_tool_session(session_id: &str) -> bool {
    parse_agent_tool_session_id(session_id).is_some()
}

/// Split a derived ID into `(message_id, call_id)`
pub fn parse_agent_tool_session_id(session_id: &str) -> Option<(&str, &str)> {
    let (message_id, call_id) = session_id.split_once(SEPARATOR)?;
    if message_id.is_empty() || call_id.is_empty() || call_id.contains(SEPARATOR) {
        return None;
    }
    Some((message_id, call_id))
}
