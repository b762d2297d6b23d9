//! Variables Module - Turning model output into slider-ready variables.
//!
//! Language-model output is not reliably well-formed. This module takes the
//! raw completion text and produces a list of bounded, steppable numeric
//! variables that every downstream consumer can use without further checks.
//!
//! # Components
//!
//! - `ResponseDecoder` - Strict JSON decoding with a fixed-order pattern fallback
//! - `VariableNormalizer` - Field coercion and numeric invariant enforcement
//! - `Variable` / `RawVariable` - Well-formed and loosely-typed records
//!
//! # Pipeline
//!
//! ```text
//! completion text ──► ResponseDecoder ──► Vec<RawVariable> ──► VariableNormalizer ──► Vec<Variable>
//! ```
//!
//! Both stages are pure and never fail as a whole: undecodable text yields an
//! empty list and a record that cannot be coerced is dropped, never zero-filled.

mod coercion;
mod decoder;
mod normalizer;
mod variable;

pub use coercion::{coerce_name, coerce_number, coerce_step, CoercionError};
pub use decoder::{DecodePath, DecodedResponse, ResponseDecoder};
pub use normalizer::{NormalizationError, VariableNormalizer};
pub use variable::{RawVariable, Variable, MIN_STEP};
