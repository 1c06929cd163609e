use crate::models::{BmiResult, HealthInput, RiskProfile};

pub const ASSESSMENT_SYSTEM_PROMPT: &str = r#"
You are a preliminary health self-assessment assistant. Your ONLY role is to
help a user understand their self-reported metrics and symptoms and to rank
possible areas of concern.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. NEVER diagnose a disease. Describe possibilities, never certainties.
2. Base your analysis ONLY on the data provided below.
3. Respect the pre-computed risk tier; never claim the situation is less
   serious than that tier indicates.
4. Output MUST be a single valid JSON object and nothing else.
5. Always include a disclaimer that this is not a medical diagnosis.
"#;

/// Build the per-request assessment prompt embedding user data, BMI, and
/// the rule-table risk profile, and requesting a fixed JSON shape back.
pub fn build_assessment_prompt(
    input: &HealthInput,
    bmi: &BmiResult,
    risk: &RiskProfile,
) -> String {
    let bmi_line = if bmi.is_valid() {
        format!("{:.2} ({})", bmi.value, bmi.category.label())
    } else {
        "not available".to_string()
    };

    let mut extra_lines = String::new();
    for (key, value) in &input.extra {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        extra_lines.push_str(&format!("- {key}: {rendered}\n"));
    }

    format!(
        r#"USER DATA:
- Name: {name}
- Age: {age}
- Sex: {sex}
- BMI: {bmi_line}
- Chronic conditions: {chronic}
- Regular medications: {medications}
- Known allergies: {allergies}
{extra_lines}
REPORTED SYMPTOMS:
- Main symptoms: "{symptoms}"
- Duration: {duration}
- Severity (0-10): {severity}

RULE-BASED RISK CLASSIFICATION (pre-computed, authoritative):
- Tier: {risk_level} of 7 — {risk_name}
- Standing advice for this tier: {risk_advice:?}

YOUR TASK:
Analyze all of the above and produce EXACTLY this JSON structure:
{{
  "summary": "1-2 sentence preliminary analysis referencing the data above",
  "possible_conditions": [
    {{ "condition": "possibly related health condition #1", "risk": "high" }},
    {{ "condition": "possibly related health condition #2", "risk": "medium" }},
    {{ "condition": "possibly related health condition #3", "risk": "low" }}
  ],
  "self_care_advice": ["4-5 practical self-care suggestions"],
  "when_to_see_doctor": ["warning signs that warrant seeing a doctor promptly"],
  "disclaimer": "state clearly that this is not a medical diagnosis"
}}

CONSTRAINTS:
1. "possible_conditions" is always an array of objects with keys
   "condition" and "risk".
2. "risk" must be exactly one of: "high", "medium", "low".
3. Order "possible_conditions" from "high" to "low".
4. Fill every field; never omit one.
"#,
        name = input.name,
        age = input.age,
        sex = input.sex.as_deref().unwrap_or("not provided"),
        chronic = input.chronic_conditions.as_deref().unwrap_or("not provided"),
        medications = input.medications.as_deref().unwrap_or("not provided"),
        allergies = input.allergies.as_deref().unwrap_or("not provided"),
        symptoms = input.symptoms,
        duration = input.duration.as_deref().unwrap_or("not provided"),
        severity = input
            .severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "not provided".to_string()),
        risk_level = risk.level,
        risk_name = risk.name,
        risk_advice = risk.advice,
    )
}
