//! Variable records before and after normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Smallest adjustment granularity a variable may carry.
pub const MIN_STEP: f64 = 0.1;

/// A decoded but unchecked variable record.
///
/// Field values are kept exactly as the decoder found them (numbers, numeric
/// strings, nulls...). Type coercion is the normalizer's job. `step` is the
/// only optional key; when absent it decodes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVariable {
    pub name: Value,
    pub min: Value,
    pub max: Value,
    pub default: Value,
    #[serde(default)]
    pub step: Value,
}

impl RawVariable {
    /// Creates a raw record from already-numeric fields.
    pub fn from_numbers(
        name: impl Into<String>,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self {
            name: Value::String(name.into()),
            min: number(min),
            max: number(max),
            default: number(default),
            step: number(step),
        }
    }
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// A well-formed sensitivity variable.
///
/// Only the normalizer constructs these, so every instance satisfies:
/// - `step >= MIN_STEP`
/// - `min <= default <= max`
/// - `min != max`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    name: String,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
}

impl Variable {
    pub(super) fn new_unchecked(name: String, min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            name,
            min,
            max,
            default,
            step,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Clamps a slider value into this variable's inclusive range.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Returns true if all numeric invariants hold.
    pub fn is_well_formed(&self) -> bool {
        self.step >= MIN_STEP
            && self.min <= self.default
            && self.default <= self.max
            && self.min != self.max
    }

    /// Converts back into a raw record (used to re-run normalization).
    pub fn to_raw(&self) -> RawVariable {
        RawVariable::from_numbers(self.name.clone(), self.min, self.max, self.default, self.step)
    }
}
