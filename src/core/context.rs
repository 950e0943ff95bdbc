//! Agent context - request-scoped invocation identity passed to tools

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::error::{FrameworkError, FrameworkResult};

/// Hidden context passed to tools during execution
///
/// This context is NOT exposed in the tool's JSON schema to the LLM. The host
/// turn loop fills in which session is running, which assistant message
/// triggered the current tool call, and the call's ID. Tools read those
/// identifiers through the typed accessors instead of receiving them as
/// arguments.
///
/// Cloning a context shares its cancellation token, so cancelling the turn
/// cancels every clone handed to a tool.
#[derive(Clone)]
pub struct AgentContext {
    // --- Identity ---
    /// Session the calling agent runs in (empty when unknown)
    session_id: String,

    /// Type of agent (e.g., "coder", "task")
    pub agent_type: String,

    // --- Lineage (for subagents) ---
    /// Parent agent's session ID (if this is a subagent)
    pub parent_session_id: Option<String>,

    // --- Current Execution State ---
    /// Assistant message that issued the current tool call
    message_id: Option<String>,

    /// Current tool_use_id being executed (set during tool execution)
    current_tool_use_id: Option<String>,

    /// Cancelled when the surrounding turn is aborted
    cancellation: CancellationToken,
}

impl fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentContext")
            .field("session_id", &self.session_id)
            .field("agent_type", &self.agent_type)
            .field("parent_session_id", &self.parent_session_id)
            .field("message_id", &self.message_id)
            .field("current_tool_use_id", &self.current_tool_use_id)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

impl AgentContext {
    /// Create a new context for a root agent (not a subagent)
    pub fn new(session_id: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            agent_type: agent_type.into(),
            parent_session_id: None,
            message_id: None,
            current_tool_use_id: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Create a new context for a subagent
    ///
    /// The child shares a token derived from the parent's, so cancelling the
    /// parent turn also cancels the sub-agent.
    pub fn new_subagent(&self, session_id: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            agent_type: agent_type.into(),
            parent_session_id: self.session_id().map(str::to_string),
            message_id: None,
            current_tool_use_id: None,
            cancellation: self.cancellation.child_token(),
        }
    }

    /// Check if this agent is a subagent
    pub fn is_subagent(&self) -> bool {
        self.parent_session_id.is_some()
    }

    // --- Identity accessors ---

    /// Session ID of the calling agent, `None` when empty
    pub fn session_id(&self) -> Option<&str> {
        non_empty(Some(self.session_id.as_str()))
    }

    /// ID of the message that triggered the current tool call
    pub fn message_id(&self) -> Option<&str> {
        non_empty(self.message_id.as_deref())
    }

    /// ID of the tool call being executed
    pub fn tool_use_id(&self) -> Option<&str> {
        non_empty(self.current_tool_use_id.as_deref())
    }

    /// Return a copy bound to the message that issued the next tool calls
    pub fn with_message_id(&self, message_id: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.message_id = Some(message_id.into());
        ctx
    }

    /// Set the current tool_use_id (returns a new context)
    pub fn with_tool_use_id(&self, tool_use_id: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.current_tool_use_id = Some(tool_use_id.into());
        ctx
    }

    /// Clear the current tool_use_id
    pub fn clear_tool_use_id(&mut self) {
        self.current_tool_use_id = None;
    }

    // --- Cancellation ---

    /// The token observed by collaborators of this call
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancel this context and every clone of it
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is cancelled first
    ///
    /// An already-cancelled context never polls `fut`.
    pub async fn cancellable<T, F>(&self, fut: F) -> FrameworkResult<T>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(FrameworkError::Interrupted);
        }
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(FrameworkError::Interrupted),
            out = fut => Ok(out),
        }
    }

    /// `cancellable` for futures that already return a `FrameworkResult`
    pub async fn try_cancellable<T, F>(&self, fut: F) -> FrameworkResult<T>
    where
        F: Future<Output = FrameworkResult<T>>,
    {
        self.cancellable(fut).await?
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Default for AgentContext {
    fn default() -> Self {
        Self::new("", "unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_root_context() {
        let ctx = AgentContext::new("session_123", "coder");
        assert_eq!(ctx.session_id(), Some("session_123"));
        assert_eq!(ctx.agent_type, "coder");
        assert!(!ctx.is_subagent());
        assert!(ctx.message_id().is_none());
        assert!(ctx.tool_use_id().is_none());
    }

    #[test]
    fn test_empty_identifiers_read_as_missing() {
        let ctx = AgentContext::new("", "coder")
            .with_message_id("")
            .with_tool_use_id("");
        assert!(ctx.session_id().is_none());
        assert!(ctx.message_id().is_none());
        assert!(ctx.tool_use_id().is_none());
    }

    #[test]
    fn test_with_tool_use_id() {
        let ctx = AgentContext::new("session", "test").with_message_id("msg_1");
        let ctx_with_tool = ctx.with_tool_use_id("tool_789");

        // Original unchanged
        assert!(ctx.tool_use_id().is_none());
        assert_eq!(ctx_with_tool.tool_use_id(), Some("tool_789"));
        assert_eq!(ctx_with_tool.message_id(), Some("msg_1"));

        let mut cleared = ctx_with_tool.clone();
        cleared.clear_tool_use_id();
        assert!(cleared.tool_use_id().is_none());
    }

    #[test]
    fn test_subagent_context_links_parent() {
        let parent = AgentContext::new("parent_session", "coder");
        let child = parent.new_subagent("child_session", "task");

        assert!(child.is_subagent());
        assert_eq!(child.parent_session_id.as_deref(), Some("parent_session"));

        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancellable_completes() {
        let ctx = AgentContext::new("s", "t");
        let out = ctx.cancellable(async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn test_cancellable_observes_cancellation() {
        let ctx = AgentContext::new("s", "t");
        let token = ctx.cancellation_token().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx
            .cancellable(tokio::time::sleep(Duration::from_secs(30)))
            .await;
        assert!(matches!(result, Err(FrameworkError::Interrupted)));
    }

    #[tokio::test]
    async fn test_try_cancellable_flattens_errors() {
        let ctx = AgentContext::new("s", "t");
        let err = ctx
            .try_cancellable(async { Err::<(), _>(FrameworkError::MissingSessionId) })
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::MissingSessionId));
    }

    #[tokio::test]
    async fn test_cancelled_context_never_polls() {
        let ctx = AgentContext::new("s", "t");
        ctx.cancel();
        let result: FrameworkResult<()> = ctx
            .cancellable(async { panic!("must not be polled") })
            .await;
        assert!(matches!(result, Err(FrameworkError::Interrupted)));
    }
}
