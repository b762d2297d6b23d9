//! In-Memory Session Store Adapter
//!
//! Holds analysis sessions for the lifetime of the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::AnalysisSession;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for analysis sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, AnalysisSession>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &AnalysisSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<AnalysisSession, SessionStoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(*id))
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::AnalysisInputs;

    fn test_session() -> AnalysisSession {
        AnalysisSession::new(AnalysisInputs::new("Algae biofuel", "Texas")).unwrap()
    }

    #[tokio::test]
    async fn save_and_load_session() {
        let store = InMemorySessionStore::new();
        let session = test_session();

        store.save(&session).await.unwrap();
        let loaded = store.load(session.id()).await.unwrap();

        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn load_unknown_session_returns_not_found() {
        let store = InMemorySessionStore::new();
        let id = SessionId::new();

        let result = store.load(&id).await;

        assert!(matches!(result, Err(SessionStoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn save_replaces_existing_session() {
        let store = InMemorySessionStore::new();
        let mut session = test_session();
        store.save(&session).await.unwrap();

        session.record_variables(Vec::new());
        store.save(&session).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.load(session.id()).await.unwrap().is_generated());
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let store = InMemorySessionStore::new();
        let session = test_session();
        store.save(&session).await.unwrap();

        store.delete(session.id()).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.delete(session.id()).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemorySessionStore::new();
        let clone = store.clone();
        clone.save(&test_session()).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        store.clear().await;
        assert_eq!(clone.count().await.unwrap(), 0);
    }
}
