//! DeleteSessionHandler - Command handler for ending a session.
//!
//! The session's variable batch is discarded with it.

use std::sync::Arc;

use tracing::info;

use crate::application::AnalysisError;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to end a session.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

/// Handler for deleting sessions.
pub struct DeleteSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl DeleteSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Unknown sessions are reported as not found rather than silently ignored.
    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<(), AnalysisError> {
        let session = self.store.load(&cmd.session_id).await?;

        self.store.delete(session.id()).await?;

        info!(
            session_id = %cmd.session_id,
            had_variables = session.is_generated(),
            "Session deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::session::{AnalysisInputs, AnalysisSession};

    #[tokio::test]
    async fn removes_saved_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = AnalysisSession::new(AnalysisInputs::new("Idea", "Place")).unwrap();
        store.save(&session).await.unwrap();

        DeleteSessionHandler::new(store.clone())
            .handle(DeleteSessionCommand {
                session_id: *session.id(),
            })
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(matches!(
            store.load(session.id()).await,
            Err(crate::ports::SessionStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());

        let result = DeleteSessionHandler::new(store)
            .handle(DeleteSessionCommand {
                session_id: SessionId::new(),
            })
            .await;

        assert!(matches!(result, Err(AnalysisError::SessionNotFound(_))));
    }
}
