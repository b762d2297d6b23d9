//! Session domain module.
//!
//! An analysis session holds the user's inputs and the variable batch
//! generated for them. The core pipeline stays stateless: handlers load a
//! session, pass its data into the pure functions, and store the result.

mod aggregate;
mod inputs;

pub use aggregate::AnalysisSession;
pub use inputs::{AnalysisInputs, UnitOfInterest, DEFAULT_EXAMPLE_TEAS};
