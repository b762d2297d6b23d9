//! TEA report prompt.

use crate::domain::session::AnalysisInputs;

pub const REPORT_SYSTEM_PROMPT: &str = "You are an expert in Techno-Economic Analysis, capable of producing comprehensive and insightful reports with specific data and detailed breakdowns, following academic standards.";

/// Renders `name: value` pairs joined by `", "`.
///
/// Whole numbers keep one decimal place (`5.0`) so integral slider values
/// read as the floats they are.
pub fn format_variable_values<S: AsRef<str>>(names: &[S], values: &[f64]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}: {}", name.as_ref(), format_value(*value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Builds the long-form TEA report prompt.
///
/// `variable_values` is the output of [`format_variable_values`].
pub fn report_prompt(inputs: &AnalysisInputs, variable_values: &str) -> String {
    format!(
        r#"You are an AI assistant specialized in conducting Techno-Economic Analyses (TEAs) for various technologies and processes. Your task is to provide a comprehensive TEA for the following business idea or technology:

Business Idea/Technology: {business_idea}
Location: {location}
Assumptions: {assumptions}
Unit of Interest: {unit_of_interest}
Examples of other TEA analyses: {example_teas}

Key Variables and Their Current Values:
{variable_values}

Conduct a detailed TEA following these steps:

1. Process Overview:
   - Summarize the key technical aspects of the proposed technology or business idea.
   - Identify the current Technology Readiness Level (TRL) and potential for advancement.
   - Create a simplified process flow diagram highlighting major steps and inputs/outputs.

2. Market Assessment:
   - Consider the location provided.
   - Analyze the potential market size and growth trends.
   - Identify key competitors and substitutes.
   - Assess market drivers and barriers.

3. Raw Materials and Feedstock:
   - List and describe all required raw materials and feedstocks.
   - Estimate costs for each, considering current market prices and potential future trends.
   - Assess the availability and sustainability of these inputs.

4. Capital Expenditure (CAPEX) Estimation:
   - Estimate costs for major equipment items.
   - Include installation costs, engineering and design fees, and contingencies.
   - Provide a breakdown of total capital investment required.
   - Consider economies of scale and how CAPEX might change with facility size.

5. Operating Expenditure (OPEX) Modeling:
   - Develop a comprehensive operating cost model, including:
     a) Raw materials and consumables
     b) Labor costs
     c) Utilities (energy, water, etc.)
     d) Maintenance and repairs
     e) Overhead and administrative costs
   - Provide a breakdown of costs per unit of product or service.

6. Process Efficiency and Yield:
   - Estimate the overall process efficiency and product yield.
   - Identify key factors affecting yield and potential for improvement.

7. Revenue Projections:
   - Estimate potential revenue based on market analysis and projected production capacity.
   - Consider different pricing scenarios and their impact on revenue.

8. Profitability Analysis:
   - Calculate key financial metrics such as Net Present Value (NPV), Internal Rate of Return (IRR), and payback period.
   - Produce a tornado chart description.
   - Perform a discounted cash flow analysis.
   - Conduct a sensitivity analysis on key variables (e.g., feedstock cost, product price, yield).

9. Environmental Impact Assessment:
   - Evaluate the potential environmental impacts of the technology or business.
   - Estimate energy requirements and greenhouse gas emissions.
   - Compare environmental performance to incumbent technologies or processes.

10. Risk Assessment:
    - Identify key technical, market, and financial risks.
    - Suggest mitigation strategies for identified risks.

11. Scalability and Technology Learning Curve:
    - Assess the scalability of the technology or business model.
    - Estimate potential cost reductions through learning curve effects or economies of scale.

12. Regulatory Landscape:
    - Outline relevant regulations and standards applicable to the technology or business.
    - Discuss how the idea complies with or addresses these regulations.

13. Co-Products and Waste Streams:
    - Identify and evaluate potential co-products or by-products.
    - Assess the marketability and value of these co-products.
    - Analyze waste streams and their disposal or potential valorization.

14. Comparative Analysis:
    - Compare the estimated costs and projected performance to industry benchmarks or competing technologies.
    - Assess the competitive advantages and disadvantages of the proposed technology or business idea.

15. Recommendations:
    - Provide 3-5 key recommendations for improving the technology's economic viability or reducing risks.
    - Suggest areas for further research or development.

16. Executive Summary:
    - Summarize the key findings of your analysis.
    - Provide an overall assessment of the technology's or business idea's potential, including strengths, weaknesses, opportunities, and threats.
    - Provide a slide about TEA for an investor deck. Write the exact words for the slide so they can be copy-pasted out.

17. Key Assumptions:
    - Make a list of the key assumptions used in this analysis.

Please ensure your analysis is data-driven and technically sound. Be specific in your cost estimates and projections, clearly stating any assumptions made. If certain data is not available, indicate this and provide a range of estimates based on comparable technologies or industry standards.

For the process flow diagram and cost models, provide detailed descriptions that could be used to create visual representations in external tools. Highlight any critical points or decision nodes in the process that significantly impact costs, efficiency, or feasibility.

Your analysis should be thorough, objective, and actionable, providing valuable insights for decision-making regarding this technology or business idea. Consider both the technical feasibility and economic viability in your overall assessment. Use sensitivity analyses to identify the most impactful parameters on the overall economics.

Format your response as a structured report with clear headings for each section, and provide specific numerical estimates where possible.

Reference the structure and depth of analysis found in these example TEAs:
- Direct Air Capture: https://pubs.acs.org/doi/10.1021/acs.est.0c00476
- Renewable Hydrogen: https://pubs.rsc.org/en/content/articlehtml/2016/ee/c5ee02573g
- https://www.sciencedirect.com/science/article/pii/S2542435121003032
- https://www.sandia.gov/research/publications/details/techno-economic-analysis-best-practices-and-assessment-tools-2020-12-01/"#,
        business_idea = inputs.business_idea,
        location = inputs.location,
        assumptions = inputs.assumptions,
        unit_of_interest = inputs.unit_of_interest,
        example_teas = inputs.example_teas,
        variable_values = variable_values,
    )
}
