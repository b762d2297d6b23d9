//! Variable-generation prompt.

use crate::domain::session::AnalysisInputs;

pub const VARIABLES_SYSTEM_PROMPT: &str = "You are an expert in Techno-Economic Analysis, capable of identifying key variables for various technologies and business ideas.";

/// Builds the user prompt asking for 7-10 tornado chart variables.
pub fn variables_prompt(inputs: &AnalysisInputs) -> String {
    format!(
        r#"Based on the following business idea and context, generate 7-10 key variables for a Techno-Economic Analysis (TEA) tornado chart. Consider technical, economic, and environmental factors.

Business Idea/Technology: {business_idea}
Location: {location}
Assumptions: {assumptions}
Examples of other TEA analyses: {example_teas}

For each variable, provide:
1. Variable name
2. Minimum value
3. Maximum value
4. Default value
5. Step size for adjustment (must be at least 0.1)

Consider variables that would be critical for a comprehensive TEA, including but not limited to:
- Capital costs (CAPEX)
- Operating costs (OPEX)
- Revenue factors
- Process efficiencies and yields
- Environmental impact factors
- Market size and growth rates
- Regulatory costs or incentives
- Raw material and feedstock costs
- Technology readiness level (TRL) related factors

Provide specific, realistic values based on current market data and industry standards. If exact data is not available, provide reasonable estimates.

Respond in the following JSON format:
[
    {{"name": "Variable 1", "min": 0, "max": 100, "default": 50, "step": 1}},
    {{"name": "Variable 2", "min": 0, "max": 100, "default": 50, "step": 0.1}},
    ...
]"#,
        business_idea = inputs.business_idea,
        location = inputs.location,
        assumptions = inputs.assumptions,
        example_teas = inputs.example_teas,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_inputs_verbatim() {
        let inputs = AnalysisInputs::new("Solar {desalination}", "Jordan")
            .with_assumptions("Grid price \"0.08\"")
            .with_example_teas("none");

        let prompt = variables_prompt(&inputs);

        assert!(prompt.contains("Business Idea/Technology: Solar {desalination}"));
        assert!(prompt.contains("Location: Jordan"));
        assert!(prompt.contains("Assumptions: Grid price \"0.08\""));
        assert!(prompt.contains("Examples of other TEA analyses: none"));
    }

    #[test]
    fn asks_for_the_fixed_json_shape() {
        let prompt = variables_prompt(&AnalysisInputs::new("Idea", "Place"));
        assert!(prompt.contains(r#"{"name": "Variable 1", "min": 0, "max": 100, "default": 50, "step": 1}"#));
        assert!(prompt.contains("must be at least 0.1"));
    }

    #[test]
    fn is_deterministic() {
        let inputs = AnalysisInputs::new("Idea", "Place");
        assert_eq!(variables_prompt(&inputs), variables_prompt(&inputs));
    }
}
