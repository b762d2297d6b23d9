//! CreateSessionHandler - Command handler for starting an analysis session.

use std::sync::Arc;

use tracing::info;

use crate::application::AnalysisError;
use crate::domain::session::{AnalysisInputs, AnalysisSession};
use crate::ports::SessionStore;

/// Command to create a new analysis session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub inputs: AnalysisInputs,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<AnalysisSession, AnalysisError> {
        let session = AnalysisSession::new(cmd.inputs)?;
        self.store.save(&session).await?;

        info!(
            session_id = %session.id(),
            unit_of_interest = %session.inputs().unit_of_interest,
            "Created analysis session"
        );
        Ok(session)
    }
}
