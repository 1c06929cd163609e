use std::collections::BTreeMap;

use serde::Deserialize;

use super::risk::ClinicalReadings;

/// Wire shape of `POST /api/assess`. Every field is optional at the serde
/// level so that a missing required field surfaces as a 400 validation
/// error from the handler instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessRequest {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub symptoms: Option<String>,

    // Clinical readings for the risk table.
    pub blood_sugar: Option<f64>,
    pub bp_sys: Option<f64>,
    pub bp_dia: Option<f64>,
    pub hba1c: Option<f64>,
    #[serde(default)]
    pub has_complications: bool,

    // Richer intake fields from the original form.
    pub duration: Option<String>,
    pub severity: Option<f64>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,

    /// Free-form extra condition fields, passed through to the prompt.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Fully validated assessment input.
#[derive(Debug, Clone)]
pub struct HealthInput {
    pub name: String,
    pub age: f64,
    pub sex: Option<String>,
    pub weight: f64,
    pub height: f64,
    pub symptoms: String,
    pub readings: ClinicalReadings,
    pub duration: Option<String>,
    pub severity: Option<f64>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub allergies: Option<String>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AssessRequest {
    /// Validate required fields and produce a `HealthInput`.
    /// Returns the list of missing field names on failure.
    pub fn validate(self) -> Result<HealthInput, Vec<&'static str>> {
        let mut missing = Vec::new();

        if self.name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        if self.weight.is_none() {
            missing.push("weight");
        }
        if self.height.is_none() {
            missing.push("height");
        }
        if self.symptoms.as_deref().map_or(true, |s| s.trim().is_empty()) {
            missing.push("symptoms");
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(HealthInput {
            name: self.name.unwrap_or_default().trim().to_string(),
            age: self.age.unwrap_or_default(),
            sex: self.sex,
            weight: self.weight.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            symptoms: self.symptoms.unwrap_or_default().trim().to_string(),
            readings: ClinicalReadings {
                blood_sugar: self.blood_sugar,
                systolic: self.bp_sys,
                diastolic: self.bp_dia,
                hba1c: self.hba1c,
                has_complications: self.has_complications,
            },
            duration: self.duration,
            severity: self.severity,
            chronic_conditions: self.chronic_conditions,
            medications: self.medications,
            allergies: self.allergies,
            extra: self.extra,
        })
    }
}
