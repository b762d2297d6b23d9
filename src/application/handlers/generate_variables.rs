//! Variable generation: one language-model call, then decode and normalize.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::application::AnalysisError;
use crate::domain::foundation::SessionId;
use crate::domain::prompts::{variables_prompt, VARIABLES_SYSTEM_PROMPT};
use crate::domain::session::{AnalysisInputs, AnalysisSession};
use crate::domain::variables::{ResponseDecoder, Variable, VariableNormalizer};
use crate::ports::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, MessageRole, RequestMetadata,
    SessionStore,
};

/// Turns analysis inputs into a normalized variable batch.
///
/// The inputs are substituted verbatim into the prompt. A failed model call
/// is returned as-is; an answer with nothing usable in it is an empty batch.
pub struct VariableGenerator {
    ai_provider: Arc<dyn AIProvider>,
    model: String,
}

impl VariableGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Self {
        Self {
            ai_provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        session_id: SessionId,
        inputs: &AnalysisInputs,
    ) -> Result<Vec<Variable>, AIError> {
        let prompt = variables_prompt(inputs);
        debug!(
            session_id = %session_id,
            model = %self.model,
            estimated_tokens = self.ai_provider.estimate_tokens(&prompt),
            "Requesting sensitivity variables"
        );

        let metadata = RequestMetadata::new(
            session_id,
            CompletionPurpose::VariableGeneration,
            format!("variables-{}", session_id),
        );
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(VARIABLES_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_model(self.model.clone());

        let response = self.ai_provider.complete(request).await.map_err(|err| {
            warn!(session_id = %session_id, error = %err, "Variable generation call failed");
            err
        })?;

        let decoded = ResponseDecoder::decode_with_path(&response.content);
        let variables = VariableNormalizer::normalize(&decoded.records);

        if variables.is_empty() {
            warn!(
                session_id = %session_id,
                decoded = decoded.records.len(),
                "No usable variables in model response"
            );
        } else {
            info!(
                session_id = %session_id,
                path = ?decoded.path,
                decoded = decoded.records.len(),
                kept = variables.len(),
                total_tokens = response.usage.total_tokens,
                "Generated sensitivity variables"
            );
        }

        Ok(variables)
    }
}

/// Command to generate (or fetch the cached) variables for a session.
#[derive(Debug, Clone)]
pub struct GenerateVariablesCommand {
    pub session_id: SessionId,
    pub regenerate: bool,
}

/// Result of a generation request.
#[derive(Debug, Clone)]
pub struct GenerateVariablesResult {
    pub session: AnalysisSession,
    /// True when the cached batch was returned without a model call.
    pub cached: bool,
}

/// Per-session locks that serialize generation for the same session.
///
/// Entries are removed once no request holds or waits on them.
#[derive(Debug, Default)]
pub struct GenerationLocks {
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl GenerationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lease(&self, id: SessionId) -> LockLease<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(id).or_default().clone();
        LockLease {
            locks: self,
            id,
            lock,
        }
    }

    /// Drops the entry when only the map and the releasing lease refer to it.
    fn release(&self, id: SessionId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(&id).is_some_and(|l| Arc::strong_count(l) == 2) {
            locks.remove(&id);
        }
    }

    /// Number of sessions with a generation in flight.
    pub fn in_flight(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Holds a session's lock entry; releases it on drop, including when the
/// request future is cancelled.
struct LockLease<'a> {
    locks: &'a GenerationLocks,
    id: SessionId,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        self.locks.release(self.id);
    }
}

/// Handler that generates variables once per session.
///
/// Concurrent requests for the same session wait on a shared lock, so only
/// the first one calls the model and the rest see its batch.
pub struct GenerateVariablesHandler {
    store: Arc<dyn SessionStore>,
    generator: Arc<VariableGenerator>,
    locks: Arc<GenerationLocks>,
}

impl GenerateVariablesHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        generator: Arc<VariableGenerator>,
        locks: Arc<GenerationLocks>,
    ) -> Self {
        Self {
            store,
            generator,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateVariablesCommand,
    ) -> Result<GenerateVariablesResult, AnalysisError> {
        let lease = self.locks.lease(cmd.session_id);
        let _guard = lease.lock.lock().await;
        self.generate_locked(&cmd).await
    }

    async fn generate_locked(
        &self,
        cmd: &GenerateVariablesCommand,
    ) -> Result<GenerateVariablesResult, AnalysisError> {
        let mut session = self.store.load(&cmd.session_id).await?;

        if !session.needs_generation(cmd.regenerate) {
            debug!(session_id = %cmd.session_id, "Returning cached variables");
            return Ok(GenerateVariablesResult {
                session,
                cached: true,
            });
        }

        let variables = self
            .generator
            .generate(cmd.session_id, session.inputs())
            .await?;

        session.record_variables(variables);
        self.store.save(&session).await?;

        Ok(GenerateVariablesResult {
            session,
            cached: false,
        })
    }
}
