//! Session registry
//!
//! `SessionService` is the contract the delegation tool relies on to create
//! task sessions and to roll a child's cost into its parent. Cost updates are
//! read-modify-write sequences, so every writer of a session's cost must hold
//! that session's `session_lock` across its get/save pair. Concurrent
//! delegations under one parent stay correct only under that discipline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::core::{AgentContext, FrameworkError, FrameworkResult};

use super::id::{agent_tool_session_id, parse_agent_tool_session_id};
use super::session::Session;
use super::storage::SessionStorage;

/// Creates, fetches and persists sessions
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Derive the child session ID for a tool call
    ///
    /// Pure: the same pair always yields the same ID. IDs containing the
    /// `$$` separator are rejected.
    fn agent_tool_session_id(&self, message_id: &str, call_id: &str) -> FrameworkResult<String> {
        agent_tool_session_id(message_id, call_id)
    }

    /// Create a task session `id` under `parent_id`
    ///
    /// Fails with `SessionAlreadyExists` if `id` is taken.
    async fn create_task_session(
        &self,
        ctx: &AgentContext,
        id: &str,
        parent_id: &str,
        title: &str,
    ) -> FrameworkResult<Session>;

    /// Fetch the current stored state of a session
    async fn get(&self, ctx: &AgentContext, id: &str) -> FrameworkResult<Session>;

    /// Persist a session and return the stored state
    async fn save(&self, ctx: &AgentContext, session: Session) -> FrameworkResult<Session>;

    /// Per-session lock serializing read-modify-write sequences
    ///
    /// Repeated calls for the same ID return the same mutex.
    fn session_lock(&self, id: &str) -> Arc<AsyncMutex<()>>;
}

/// `SessionService` persisting to a `SessionStorage` directory
#[derive(Debug)]
pub struct FileSessionRegistry {
    storage: SessionStorage,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FileSessionRegistry {
    pub fn new(storage: SessionStorage) -> Self {
        Self {
            storage,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a root session with a fresh ID
    pub async fn create(&self, ctx: &AgentContext, title: &str) -> FrameworkResult<Session> {
        check_cancelled(ctx)?;
        let session = Session::new(Uuid::new_v4().to_string(), title);
        self.storage.save(&session)?;
        tracing::info!("[SessionRegistry] Created session {}", session.id);
        Ok(session)
    }

    /// IDs of all stored sessions
    pub fn list(&self) -> FrameworkResult<Vec<String>> {
        self.storage.list_sessions()
    }

    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }
}

fn check_cancelled(ctx: &AgentContext) -> FrameworkResult<()> {
    if ctx.is_cancelled() {
        return Err(FrameworkError::Interrupted);
    }
    Ok(())
}

#[async_trait]
impl SessionService for FileSessionRegistry {
    async fn create_task_session(
        &self,
        ctx: &AgentContext,
        id: &str,
        parent_id: &str,
        title: &str,
    ) -> FrameworkResult<Session> {
        check_cancelled(ctx)?;

        // Parent lineage is updated under the parent's lock so it cannot
        // interleave with a cost rollup on the same parent.
        let parent_lock = self.session_lock(parent_id);
        let _guard = ctx.cancellable(parent_lock.lock()).await?;

        let mut parent = self.storage.load(parent_id)?;
        if self.storage.session_exists(id) {
            return Err(FrameworkError::SessionAlreadyExists(id.to_string()));
        }

        let mut session = Session::new_task(id, parent_id, title);
        session.parent_tool_use_id =
            parse_agent_tool_session_id(id).map(|(_, call_id)| call_id.to_string());
        self.storage.save(&session)?;

        parent.add_child(id);
        self.storage.save(&parent)?;

        tracing::info!(
            "[SessionRegistry] Created task session {} under {}",
            id,
            parent_id
        );
        Ok(session)
    }

    async fn get(&self, ctx: &AgentContext, id: &str) -> FrameworkResult<Session> {
        check_cancelled(ctx)?;
        self.storage.load(id)
    }

    async fn save(&self, ctx: &AgentContext, mut session: Session) -> FrameworkResult<Session> {
        check_cancelled(ctx)?;
        session.touch();
        self.storage.save(&session)?;
        tracing::debug!(
            "[SessionRegistry] Saved session {} (cost={:.6})",
            session.id,
            session.cost
        );
        Ok(session)
    }

    /// Entries nobody else references are dropped on each call, so the map
    /// only tracks sessions with a live lock handle.
    fn session_lock(&self, id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|key, lock| key == id || Arc::strong_count(lock) > 1);
        locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
