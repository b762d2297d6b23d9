//! Explicit field coercion at the decoder/normalizer boundary.
//!
//! Model output mixes numbers and numeric strings freely. Each field is
//! coerced on its own and a failure names the offending field, so the
//! normalizer can drop exactly the record it belongs to.

use serde_json::Value;
use thiserror::Error;

use super::MIN_STEP;

/// A single field that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("Field '{field}' is missing")]
    Missing { field: &'static str },

    #[error("Field '{field}' is not numeric: {found}")]
    NotNumeric { field: &'static str, found: String },

    #[error("Field '{field}' is not finite: {found}")]
    NotFinite { field: &'static str, found: String },

    #[error("Field 'name' is empty")]
    EmptyName,

    #[error("Field 'name' is not text: {found}")]
    InvalidName { found: String },
}

/// Coerces a numeric field to `f64`.
///
/// Accepts JSON numbers and strings holding a decimal literal (surrounding
/// whitespace is ignored). Booleans, nulls, arrays, objects and non-finite
/// values are rejected.
pub fn coerce_number(field: &'static str, value: &Value) -> Result<f64, CoercionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| CoercionError::NotNumeric {
            field,
            found: n.to_string(),
        })?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| CoercionError::NotNumeric {
            field,
            found: s.clone(),
        })?,
        Value::Null => return Err(CoercionError::Missing { field }),
        other => {
            return Err(CoercionError::NotNumeric {
                field,
                found: other.to_string(),
            })
        }
    };

    if !parsed.is_finite() {
        return Err(CoercionError::NotFinite {
            field,
            found: value.to_string(),
        });
    }

    Ok(parsed)
}

/// Coerces the step field, raising it to `MIN_STEP`.
///
/// A missing (`null`) step becomes `MIN_STEP`; any other value must coerce
/// like a regular numeric field.
pub fn coerce_step(value: &Value) -> Result<f64, CoercionError> {
    match value {
        Value::Null => Ok(MIN_STEP),
        other => Ok(coerce_number("step", other)?.max(MIN_STEP)),
    }
}

/// Coerces the name field to a non-empty label.
pub fn coerce_name(value: &Value) -> Result<String, CoercionError> {
    let name = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(CoercionError::Missing { field: "name" }),
        other => {
            return Err(CoercionError::InvalidName {
                found: other.to_string(),
            })
        }
    };

    if name.is_empty() {
        return Err(CoercionError::EmptyName);
    }
    Ok(name)
}
