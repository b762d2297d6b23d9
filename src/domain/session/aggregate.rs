//! Analysis session aggregate.
//!
//! # Invariants
//!
//! - `variables` is only ever replaced as a whole batch, never edited
//! - `generated` is true once a generation result has been recorded
//! - Slider values are aligned by position with `variables`

use serde::Serialize;

use crate::domain::foundation::{SessionId, Timestamp, ValidationError};
use crate::domain::sensitivity::InputMismatchError;
use crate::domain::variables::Variable;

use super::AnalysisInputs;

/// One user's exploration of one business idea.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSession {
    id: SessionId,
    inputs: AnalysisInputs,
    variables: Vec<Variable>,
    generated: bool,
    generated_at: Option<Timestamp>,
    created_at: Timestamp,
}

impl AnalysisSession {
    /// Creates a session for validated inputs.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the business idea or location is blank
    pub fn new(inputs: AnalysisInputs) -> Result<Self, ValidationError> {
        inputs.validate()?;
        Ok(Self {
            id: SessionId::new(),
            inputs,
            variables: Vec::new(),
            generated: false,
            generated_at: None,
            created_at: Timestamp::now(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn inputs(&self) -> &AnalysisInputs {
        &self.inputs
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn generated_at(&self) -> Option<&Timestamp> {
        self.generated_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a generation call is needed.
    ///
    /// A batch is generated once per session; an empty batch counts as a
    /// failed generation and is retried on the next request.
    pub fn needs_generation(&self, regenerate: bool) -> bool {
        regenerate || !self.generated || self.variables.is_empty()
    }

    /// Replaces the variable batch with a fresh generation result.
    pub fn record_variables(&mut self, variables: Vec<Variable>) {
        self.variables = variables;
        self.generated = true;
        self.generated_at = Some(Timestamp::now());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slider values
    // ─────────────────────────────────────────────────────────────────────────

    /// Each variable's default value, in batch order.
    pub fn default_values(&self) -> Vec<f64> {
        self.variables.iter().map(|v| v.default_value()).collect()
    }

    /// Aligns user-supplied values with the batch, clamping each into range.
    pub fn slider_values(&self, values: &[f64]) -> Result<Vec<f64>, InputMismatchError> {
        if values.len() != self.variables.len() {
            return Err(InputMismatchError {
                names: self.variables.len(),
                values: values.len(),
            });
        }

        Ok(self
            .variables
            .iter()
            .zip(values)
            .map(|(variable, &value)| variable.clamp(value))
            .collect())
    }

    /// Uses the supplied values, or the defaults when none are given.
    pub fn resolve_values(&self, values: Option<&[f64]>) -> Result<Vec<f64>, InputMismatchError> {
        match values {
            Some(values) => self.slider_values(values),
            None => Ok(self.default_values()),
        }
    }
}
