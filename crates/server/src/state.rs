//! Shared server state and the per-customer session map.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use aqua_agent_agent::{AgentEngine, Session};
use aqua_agent_config::ConversationSettings;

/// Application state shared by all request handlers.
///
/// Each customer conversation owns an independent [`Session`] keyed by
/// UUID. The per-session mutex serializes turns: extraction, gating,
/// filtering and collaborator calls for one turn complete before the
/// next turn of that session begins. The catalog inside the engine is
/// read-only and shared freely.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AgentEngine>,
    sessions: Arc<DashMap<Uuid, Arc<Mutex<Session>>>>,
    conversation: ConversationSettings,
}

impl AppState {
    pub fn new(engine: AgentEngine, conversation: ConversationSettings) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(DashMap::new()),
            conversation,
        }
    }

    /// Look up an existing session or create a fresh one.
    pub fn session(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<Session>>) {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(session = %id, "creating session");
                Arc::new(Mutex::new(Session::new(&self.conversation)))
            })
            .clone();
        (id, session)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
