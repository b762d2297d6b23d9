//! Application-level errors shared by the analysis handlers.

use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::sensitivity::InputMismatchError;
use crate::ports::{AIError, SessionStoreError};

/// Errors surfaced by the analysis handlers
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The language-model call failed; never retried here.
    #[error("remote service error: {0}")]
    RemoteService(#[from] AIError),

    #[error(transparent)]
    InputMismatch(#[from] InputMismatchError),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl AnalysisError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::InvalidInput(err.to_string())
    }
}

impl From<SessionStoreError> for AnalysisError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => AnalysisError::SessionNotFound(id),
            other => AnalysisError::Storage(other.to_string()),
        }
    }
}
