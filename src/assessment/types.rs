use serde::Serialize;
use uuid::Uuid;

use super::AssessmentError;
use crate::models::{BmiResult, RiskProfile};

/// Complete result of one assessment. Always success-shaped: when the AI
/// call exhausts its retry budget the analysis is the canned fallback and
/// `degraded` is set.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub request_id: Uuid,
    pub bmi: BmiResult,
    pub risk: RiskProfile,
    /// Opaque AI payload. Verified to be a JSON object, nothing more.
    pub analysis: serde_json::Value,
    pub degraded: bool,
    pub attempts: usize,
    pub last_error: Option<String>,
}

/// LLM client abstraction (allows mocking).
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, AssessmentError>;

    fn is_model_available(&self, model: &str) -> Result<bool, AssessmentError>;

    fn list_models(&self) -> Result<Vec<String>, AssessmentError>;
}
