//! GetSessionHandler - Query handler for a session snapshot.

use std::sync::Arc;

use crate::application::AnalysisError;
use crate::domain::foundation::SessionId;
use crate::domain::session::AnalysisSession;
use crate::ports::SessionStore;

/// Query for a single session.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for session lookups.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<AnalysisSession, AnalysisError> {
        Ok(self.store.load(&query.session_id).await?)
    }
}
