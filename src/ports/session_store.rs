//! Session Store Port - Interface for holding analysis sessions.
//!
//! Sessions live for the lifetime of the process only.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::AnalysisSession;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Port for saving and loading analysis sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save (insert or replace) a session
    async fn save(&self, session: &AnalysisSession) -> Result<(), SessionStoreError>;

    /// Load a session
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists
    async fn load(&self, id: &SessionId) -> Result<AnalysisSession, SessionStoreError>;

    /// Delete a session; deleting an unknown session is not an error
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;

    /// Number of sessions currently held
    async fn count(&self) -> Result<usize, SessionStoreError>;
}
