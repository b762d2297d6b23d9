//! Report generation: the long-form TEA write-up for the current slider values.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::AnalysisError;
use crate::domain::foundation::SessionId;
use crate::domain::prompts::{format_variable_values, report_prompt, REPORT_SYSTEM_PROMPT};
use crate::domain::sensitivity::InputMismatchError;
use crate::domain::session::AnalysisInputs;
use crate::ports::{
    AIProvider, CompletionPurpose, CompletionRequest, MessageRole, RequestMetadata, SessionStore,
};

/// Produces TEA reports through the language-model port.
pub struct ReportGenerator {
    ai_provider: Arc<dyn AIProvider>,
    model: String,
}

impl ReportGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Self {
        Self {
            ai_provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a report for `names[i] = values[i]`.
    ///
    /// The unit of interest comes from `inputs`. The model's text is returned
    /// unparsed.
    pub async fn generate_report<S: AsRef<str>>(
        &self,
        session_id: SessionId,
        inputs: &AnalysisInputs,
        names: &[S],
        values: &[f64],
    ) -> Result<String, AnalysisError> {
        if names.len() != values.len() {
            return Err(InputMismatchError {
                names: names.len(),
                values: values.len(),
            }
            .into());
        }

        let prompt = report_prompt(inputs, &format_variable_values(names, values));

        let metadata = RequestMetadata::new(
            session_id,
            CompletionPurpose::ReportGeneration,
            format!("report-{}", session_id),
        );
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(REPORT_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_model(self.model.clone());

        let response = self.ai_provider.complete(request).await.map_err(|err| {
            warn!(session_id = %session_id, error = %err, "Report generation call failed");
            err
        })?;

        info!(
            session_id = %session_id,
            unit_of_interest = %inputs.unit_of_interest,
            variables = names.len(),
            report_chars = response.content.len(),
            total_tokens = response.usage.total_tokens,
            "Generated TEA report"
        );

        Ok(response.content)
    }
}

/// Command to generate a report for a session.
#[derive(Debug, Clone)]
pub struct GenerateReportCommand {
    pub session_id: SessionId,
    /// Slider values aligned with the session's variables; defaults when `None`.
    pub values: Option<Vec<f64>>,
}

/// Result of report generation.
#[derive(Debug, Clone)]
pub struct GenerateReportResult {
    pub report: String,
    /// The clamped values the report was written for.
    pub values: Vec<f64>,
}

/// Handler for session reports.
pub struct GenerateReportHandler {
    store: Arc<dyn SessionStore>,
    generator: Arc<ReportGenerator>,
}

impl GenerateReportHandler {
    pub fn new(store: Arc<dyn SessionStore>, generator: Arc<ReportGenerator>) -> Self {
        Self { store, generator }
    }

    pub async fn handle(
        &self,
        cmd: GenerateReportCommand,
    ) -> Result<GenerateReportResult, AnalysisError> {
        let session = self.store.load(&cmd.session_id).await?;

        if session.variables().is_empty() {
            return Err(AnalysisError::invalid_input(
                "Generate variables before requesting a report",
            ));
        }

        let values = session.resolve_values(cmd.values.as_deref())?;
        let names = session.variable_names();

        let report = self
            .generator
            .generate_report(cmd.session_id, session.inputs(), &names, &values)
            .await?;

        Ok(GenerateReportResult { report, values })
    }
}
