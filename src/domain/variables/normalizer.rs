//! Variable Normalizer - Coercion and numeric invariant enforcement.

use thiserror::Error;
use tracing::debug;

use super::coercion::{coerce_name, coerce_number, coerce_step, CoercionError};
use super::{RawVariable, Variable};

/// Why a single raw record was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Widening by one step could not separate min and max (magnitude too
    /// large for the step to register in `f64`).
    #[error("Range of '{name}' collapses at {value} even after widening by {step}")]
    DegenerateRange { name: String, value: f64, step: f64 },
}

/// Turns raw decoded records into well-formed variables.
pub struct VariableNormalizer;

impl VariableNormalizer {
    /// Normalizes every record, dropping the ones that cannot be coerced.
    ///
    /// Output order follows input order. Dropped records are never replaced
    /// by made-up values.
    pub fn normalize(raw: &[RawVariable]) -> Vec<Variable> {
        raw.iter()
            .enumerate()
            .filter_map(|(index, record)| match Self::normalize_one(record) {
                Ok(variable) => Some(variable),
                Err(e) => {
                    debug!(index, error = %e, "Dropping malformed variable record");
                    None
                }
            })
            .collect()
    }

    /// Normalizes a single record.
    ///
    /// # Algorithm
    /// 1. Coerce `min`, `max`, `default`, `step` to `f64`
    /// 2. `step = max(0.1, step)`
    /// 3. `min = min(min, default)`, `max = max(max, default)`
    /// 4. If `min == max`, widen `max` by one `step`
    pub fn normalize_one(raw: &RawVariable) -> Result<Variable, NormalizationError> {
        let name = coerce_name(&raw.name)?;
        let raw_min = coerce_number("min", &raw.min)?;
        let raw_max = coerce_number("max", &raw.max)?;
        let default = coerce_number("default", &raw.default)?;
        let step = coerce_step(&raw.step)?;

        let min = raw_min.min(default);
        let mut max = raw_max.max(default);

        if min == max {
            max += step;
            if min == max {
                return Err(NormalizationError::DegenerateRange {
                    name,
                    value: min,
                    step,
                });
            }
        }

        Ok(Variable::new_unchecked(name, min, max, default, step))
    }
}
