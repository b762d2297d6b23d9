//! User-supplied inputs for an analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Reference TEA studies offered when the user gives none.
pub const DEFAULT_EXAMPLE_TEAS: &str = "\
https://pubs.acs.org/doi/10.1021/acs.est.0c00476
https://www.sciencedirect.com/science/article/pii/S2542435121003032
https://pubs.rsc.org/en/content/articlehtml/2016/ee/c5ee02573g
https://www.sandia.gov/research/publications/details/techno-economic-analysis-best-practices-and-assessment-tools-2020-12-01/";

/// What the report's per-unit economics are expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitOfInterest {
    #[default]
    Product,
    Process,
    Operation,
}

impl UnitOfInterest {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfInterest::Product => "Product",
            UnitOfInterest::Process => "Process",
            UnitOfInterest::Operation => "Operation",
        }
    }
}

impl fmt::Display for UnitOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitOfInterest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(UnitOfInterest::Product),
            "process" => Ok(UnitOfInterest::Process),
            "operation" => Ok(UnitOfInterest::Operation),
            other => Err(ValidationError::invalid_format(
                "unit_of_interest",
                format!("unknown unit '{}'", other),
            )),
        }
    }
}

/// Free-text description of the idea under analysis.
///
/// Text is passed to the prompts verbatim; no escaping is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInputs {
    pub business_idea: String,
    pub location: String,
    #[serde(default)]
    pub assumptions: String,
    #[serde(default = "default_example_teas")]
    pub example_teas: String,
    #[serde(default)]
    pub unit_of_interest: UnitOfInterest,
}

fn default_example_teas() -> String {
    DEFAULT_EXAMPLE_TEAS.to_string()
}

impl AnalysisInputs {
    /// Creates inputs with empty assumptions and the default example TEAs.
    pub fn new(business_idea: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            business_idea: business_idea.into(),
            location: location.into(),
            assumptions: String::new(),
            example_teas: default_example_teas(),
            unit_of_interest: UnitOfInterest::default(),
        }
    }

    pub fn with_assumptions(mut self, assumptions: impl Into<String>) -> Self {
        self.assumptions = assumptions.into();
        self
    }

    pub fn with_example_teas(mut self, example_teas: impl Into<String>) -> Self {
        self.example_teas = example_teas.into();
        self
    }

    pub fn with_unit_of_interest(mut self, unit: UnitOfInterest) -> Self {
        self.unit_of_interest = unit;
        self
    }

    /// A session needs at least an idea and a location to start.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.business_idea.trim().is_empty() {
            return Err(ValidationError::empty_field("business_idea"));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::empty_field("location"));
        }
        Ok(())
    }
}
