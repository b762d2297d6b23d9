//! Response Decoder - Two-tier decoding of variable lists from model output.
//!
//! # Tiers
//!
//! 1. **Strict**: the whole response is a JSON array of objects carrying
//!    `name`, `min`, `max`, `default` and (optionally) `step`.
//! 2. **Pattern**: anything else is scanned for fragments shaped like
//!    `name: X, min: 0, max: 10, default: 5, step: 1`, with optional double
//!    quotes around keys and the name.
//!
//! The pattern tier only recognises keys in exactly the order
//! `name, min, max, default, step`, and only unsigned integer or decimal
//! literals. Reordered keys or negative numbers produce no match for that
//! variable.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{RawVariable, MIN_STEP};

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"name"?\s*:\s*"?([^"]+)"?,"#,
        r#"\s*"?min"?\s*:\s*(\d+(?:\.\d+)?),"#,
        r#"\s*"?max"?\s*:\s*(\d+(?:\.\d+)?),"#,
        r#"\s*"?default"?\s*:\s*(\d+(?:\.\d+)?),"#,
        r#"\s*"?step"?\s*:\s*(\d+(?:\.\d+)?)"#,
    ))
    .expect("variable pattern is a valid regex")
});

/// Which decoding tier produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    /// The response was a JSON array of variable objects.
    Strict,
    /// The response was scanned with the fixed-order pattern.
    Pattern,
}

/// Decoded records plus the tier that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    pub records: Vec<RawVariable>,
    pub path: DecodePath,
}

impl DecodedResponse {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decodes variable records from raw completion text.
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Decodes raw text into loosely-typed variable records.
    ///
    /// Never fails: text that matches neither tier yields an empty list.
    pub fn decode(raw_text: &str) -> Vec<RawVariable> {
        Self::decode_with_path(raw_text).records
    }

    /// Decodes raw text and reports which tier was used.
    pub fn decode_with_path(raw_text: &str) -> DecodedResponse {
        match serde_json::from_str::<Vec<RawVariable>>(raw_text) {
            Ok(records) => {
                debug!(count = records.len(), "Decoded variables as strict JSON");
                DecodedResponse {
                    records,
                    path: DecodePath::Strict,
                }
            }
            Err(e) => {
                debug!("Strict decoding failed ({}), scanning for variable fragments", e);
                let records = Self::extract_fragments(raw_text);
                debug!(count = records.len(), "Extracted variables by pattern");
                DecodedResponse {
                    records,
                    path: DecodePath::Pattern,
                }
            }
        }
    }

    /// Scans free text for fixed-order variable fragments.
    ///
    /// The step of every match is floored to `MIN_STEP` here already; the
    /// normalizer applies the same floor again, which is a no-op.
    fn extract_fragments(text: &str) -> Vec<RawVariable> {
        VARIABLE_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                let min = parse_literal(caps.get(2)?.as_str())?;
                let max = parse_literal(caps.get(3)?.as_str())?;
                let default = parse_literal(caps.get(4)?.as_str())?;
                let step = parse_literal(caps.get(5)?.as_str())?.max(MIN_STEP);
                Some(RawVariable::from_numbers(name, min, max, default, step))
            })
            .collect()
    }
}

/// Parses a numeric literal captured by the pattern.
///
/// `\d` also matches non-ASCII digits which `f64` parsing refuses; such a
/// fragment is skipped rather than guessed at.
fn parse_literal(literal: &str) -> Option<f64> {
    match literal.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            debug!(literal, "Skipping fragment with unparseable number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    mod strict {
        use super::*;

        #[test]
        fn decodes_json_array_verbatim() {
            let raw = r#"[{"name":"X","min":0,"max":10,"default":5,"step":1}]"#;
            let decoded = ResponseDecoder::decode_with_path(raw);

            assert_eq!(decoded.path, DecodePath::Strict);
            assert_eq!(decoded.records.len(), 1);
            let record = &decoded.records[0];
            assert_eq!(record.name, json!("X"));
            assert_eq!(record.min, json!(0));
            assert_eq!(record.max, json!(10));
            assert_eq!(record.default, json!(5));
            assert_eq!(record.step, json!(1));
        }

        #[test]
        fn keeps_string_fields_for_the_normalizer() {
            let raw = r#"[{"name":"Price","min":"1.5","max":"3","default":2,"step":"0.5"}]"#;
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records[0].min, json!("1.5"));
            assert_eq!(records[0].step, json!("0.5"));
        }

        #[test]
        fn does_not_floor_step_on_strict_path() {
            let raw = r#"[{"name":"Fine","min":0,"max":1,"default":0.5,"step":0.01}]"#;
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records[0].step.as_f64(), Some(0.01));
        }

        #[test]
        fn accepts_missing_step() {
            let raw = r#"[{"name":"Yield","min":50,"max":90,"default":75}]"#;
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].step, Value::Null);
        }

        #[test]
        fn empty_array_is_strict_and_empty() {
            let decoded = ResponseDecoder::decode_with_path("  []  ");
            assert_eq!(decoded.path, DecodePath::Strict);
            assert!(decoded.is_empty());
        }

        #[test]
        fn negative_numbers_survive_strict_path() {
            let raw = r#"[{"name":"Carbon credit","min":-20,"max":40,"default":10,"step":5}]"#;
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records[0].min, json!(-20));
        }
    }

    mod pattern {
        use super::*;

        #[test]
        fn extracts_from_prose() {
            let raw = "Sure! Here is one: name: X, min: 0, max: 10, default: 5, step: 1. Enjoy.";
            let decoded = ResponseDecoder::decode_with_path(raw);

            assert_eq!(decoded.path, DecodePath::Pattern);
            assert_eq!(
                decoded.records,
                vec![RawVariable::from_numbers("X", 0.0, 10.0, 5.0, 1.0)]
            );
        }

        #[test]
        fn extracts_json_wrapped_in_markdown() {
            let raw = r#"Here are the variables:
```json
[
  {"name": "CAPEX ($M)", "min": 10, "max": 50, "default": 25, "step": 1},
  {"name": "Electricity price ($/kWh)", "min": 0.02, "max": 0.12, "default": 0.06, "step": 0.01},
]
```"#;
            let records = ResponseDecoder::decode(raw);

            assert_eq!(records.len(), 2);
            assert_eq!(records[0].name, json!("CAPEX ($M)"));
            assert_eq!(records[1].name, json!("Electricity price ($/kWh)"));
            assert_eq!(records[1].default.as_f64(), Some(0.06));
        }

        #[test]
        fn floors_step_at_extraction() {
            let raw = r#"{"name": "Efficiency", "min": 0.5, "max": 0.9, "default": 0.7, "step": 0.01}"#;
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records[0].step.as_f64(), Some(MIN_STEP));
        }

        #[test]
        fn object_wrapper_falls_back_to_pattern() {
            let raw = r#"{"variables": [{"name": "Yield", "min": 1, "max": 3, "default": 2, "step": 1}]}"#;
            let decoded = ResponseDecoder::decode_with_path(raw);
            assert_eq!(decoded.path, DecodePath::Pattern);
            assert_eq!(decoded.records.len(), 1);
            assert_eq!(decoded.records[0].name, json!("Yield"));
        }

        #[test]
        fn missing_key_in_json_falls_back_to_pattern() {
            let raw = r#"[
  {"name": "A", "min": 1, "max": 3, "default": 2, "step": 1},
  {"name": "B", "min": 1, "max": 3, "step": 1}
]"#;
            let decoded = ResponseDecoder::decode_with_path(raw);
            assert_eq!(decoded.path, DecodePath::Pattern);
            assert_eq!(decoded.records.len(), 1);
            assert_eq!(decoded.records[0].name, json!("A"));
        }

        #[test]
        fn reordered_keys_do_not_match() {
            let raw = r#"Variables: {"name": "Price", "max": 10, "min": 0, "default": 5, "step": 1}"#;
            assert!(ResponseDecoder::decode(raw).is_empty());
        }

        #[test]
        fn negative_numbers_do_not_match() {
            let raw = r#"{"name": "Subsidy", "min": -5, "max": 10, "default": 0, "step": 1}"#;
            assert!(ResponseDecoder::decode(raw).is_empty());
        }

        #[test]
        fn integers_become_floats() {
            let raw = "name: Plant size, min: 100, max: 500, default: 250, step: 10";
            let records = ResponseDecoder::decode(raw);
            assert_eq!(records[0].min, json!(100.0));
            assert_eq!(records[0].step, json!(10.0));
        }
    }

    mod empty {
        use super::*;

        #[test]
        fn empty_text_yields_nothing() {
            assert!(ResponseDecoder::decode("").is_empty());
        }

        #[test]
        fn unrelated_text_yields_nothing() {
            assert!(ResponseDecoder::decode("not json and no pattern matches").is_empty());
        }

        #[test]
        fn json_object_without_fragments_yields_nothing() {
            assert!(ResponseDecoder::decode(r#"{"error": "try again"}"#).is_empty());
        }
    }
}
