use uuid::Uuid;

use super::parser::parse_analysis;
use super::prompt::{build_assessment_prompt, ASSESSMENT_SYSTEM_PROMPT};
use super::retry::RetryPolicy;
use super::types::{AssessmentReport, LlmClient};
use super::AssessmentError;
use crate::models::{classify, compute_bmi, HealthInput};

/// Orchestrates a full assessment:
/// BMI → risk classification → prompt → LLM with retry → parse → report
pub struct HealthAssessor {
    llm: Box<dyn LlmClient + Send + Sync>,
    model: Option<String>,
    retry: RetryPolicy,
}

impl HealthAssessor {
    pub fn new(
        llm: Box<dyn LlmClient + Send + Sync>,
        model_name: &str,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            llm,
            model: Some(model_name.to_string()),
            retry,
        }
    }

    /// Assessor for a startup where no model could be resolved. The API
    /// layer gates `/api/assess` on `is_configured`.
    pub fn without_model(llm: Box<dyn LlmClient + Send + Sync>, retry: RetryPolicy) -> Self {
        Self {
            llm,
            model: None,
            retry,
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Whether a model was resolved at startup. A static check, unlike the
    /// live `ai_ready` probe.
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Probe whether the configured model is reachable right now.
    pub fn ai_ready(&self) -> bool {
        match self.model.as_deref() {
            Some(model) => self.llm.is_model_available(model).unwrap_or(false),
            None => false,
        }
    }

    /// Run the assessment. Always returns a success-shaped report: AI
    /// failures degrade into the canned fallback payload instead of
    /// propagating. This call blocks (LLM transport and retry sleeps);
    /// async callers must bridge via `spawn_blocking`.
    pub fn assess(&self, input: &HealthInput) -> AssessmentReport {
        let request_id = Uuid::new_v4();
        let _span =
            tracing::info_span!("assess", %request_id, name = %input.name).entered();

        let bmi = compute_bmi(Some(input.weight), Some(input.height));
        let risk = classify(&input.readings);
        tracing::debug!(bmi = bmi.value, risk_level = risk.level, "Rule evaluation done");

        let Some(model) = self.model.as_deref() else {
            // Callers gate on `is_configured`; degrade rather than panic
            // if one reaches this anyway.
            let e = AssessmentError::NoModelAvailable;
            return AssessmentReport {
                request_id,
                bmi,
                risk,
                analysis: fallback_analysis(&e),
                degraded: true,
                attempts: 0,
                last_error: Some(e.to_string()),
            };
        };

        let prompt = build_assessment_prompt(input, &bmi, &risk);

        match self.call_llm_with_retry(model, &prompt, &request_id) {
            Ok((analysis, attempts)) => AssessmentReport {
                request_id,
                bmi,
                risk,
                analysis,
                degraded: false,
                attempts,
                last_error: None,
            },
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "AI analysis unavailable, returning fallback");
                AssessmentReport {
                    request_id,
                    bmi,
                    risk,
                    analysis: fallback_analysis(&e),
                    degraded: true,
                    attempts: self.retry.max_attempts,
                    last_error: Some(e.to_string()),
                }
            }
        }
    }

    /// Call the LLM and parse its output, retrying on both transport and
    /// parse failures up to the policy's budget with its fixed delay.
    /// Returns the parsed analysis and the number of attempts made.
    fn call_llm_with_retry(
        &self,
        model: &str,
        prompt: &str,
        request_id: &Uuid,
    ) -> Result<(serde_json::Value, usize), AssessmentError> {
        let mut last_error: Option<AssessmentError> = None;

        for attempt in 1..=self.retry.max_attempts {
            if attempt > 1 {
                std::thread::sleep(self.retry.delay);
            }

            let raw = match self.llm.generate(model, prompt, ASSESSMENT_SYSTEM_PROMPT) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(%request_id, attempt, error = %e, "AI call failed");
                    last_error = Some(e);
                    continue;
                }
            };

            match parse_analysis(&raw) {
                Ok(analysis) => return Ok((analysis, attempt)),
                Err(e) => {
                    tracing::warn!(%request_id, attempt, error = %e, "AI response parse failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AssessmentError::MalformedResponse("All retry attempts exhausted".into())
        }))
    }
}

/// The canned payload returned when the retry budget is exhausted: a
/// generic apology, the captured error, and advice to see a professional.
fn fallback_analysis(last_error: &AssessmentError) -> serde_json::Value {
    serde_json::json!({
        "summary": "Sorry — the AI analysis could not be generated right now. \
                    The rule-based risk classification in this response is still valid.",
        "error": last_error.to_string(),
        "possible_conditions": [],
        "self_care_advice": [],
        "when_to_see_doctor": [
            "Consult a healthcare professional to review these readings in person."
        ],
        "disclaimer": "This is not a medical diagnosis. Always consult a qualified \
                       professional for an accurate evaluation."
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::assessment::ollama::MockLlmClient;
    use crate::models::ClinicalReadings;

    /// Mock client that returns a malformed response N times, then a
    /// valid one.
    struct FailThenSucceedLlmClient {
        fail_count: usize,
        call_count: AtomicUsize,
        fail_response: String,
        success_response: String,
    }

    impl FailThenSucceedLlmClient {
        fn new(fail_count: usize, fail_response: &str, success_response: &str) -> Self {
            Self {
                fail_count,
                call_count: AtomicUsize::new(0),
                fail_response: fail_response.to_string(),
                success_response: success_response.to_string(),
            }
        }

    }

    impl LlmClient for FailThenSucceedLlmClient {
        fn generate(
            &self,
            _model: &str,
            _prompt: &str,
            _system: &str,
        ) -> Result<String, AssessmentError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);
            if count < self.fail_count {
                Ok(self.fail_response.clone())
            } else {
                Ok(self.success_response.clone())
            }
        }

        fn is_model_available(&self, _model: &str) -> Result<bool, AssessmentError> {
            Ok(true)
        }

        fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
            Ok(vec!["medgemma:latest".into()])
        }
    }

    /// Mock client whose transport always errors.
    struct ErringLlmClient {
        call_count: AtomicUsize,
    }

    impl LlmClient for ErringLlmClient {
        fn generate(
            &self,
            _model: &str,
            _prompt: &str,
            _system: &str,
        ) -> Result<String, AssessmentError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Err(AssessmentError::AiConnection("http://localhost:11434".into()))
        }

        fn is_model_available(&self, _model: &str) -> Result<bool, AssessmentError> {
            Err(AssessmentError::AiConnection("http://localhost:11434".into()))
        }

        fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
            Err(AssessmentError::AiConnection("http://localhost:11434".into()))
        }
    }

    fn sample_input() -> HealthInput {
        HealthInput {
            name: "A".into(),
            age: 30.0,
            sex: None,
            weight: 70.0,
            height: 175.0,
            symptoms: "headache".into(),
            readings: ClinicalReadings {
                blood_sugar: Some(126.0),
                ..Default::default()
            },
            duration: None,
            severity: None,
            chronic_conditions: None,
            medications: None,
            allergies: None,
            extra: Default::default(),
        }
    }

    fn valid_analysis() -> String {
        serde_json::json!({
            "summary": "Mild headache with slightly elevated fasting glucose.",
            "possible_conditions": [
                { "condition": "Tension headache", "risk": "medium" },
                { "condition": "Early dysglycemia", "risk": "low" }
            ],
            "self_care_advice": ["Hydrate", "Rest", "Limit screen time", "Reduce sugar"],
            "when_to_see_doctor": ["Sudden severe headache", "Vision changes"],
            "disclaimer": "Not a medical diagnosis."
        })
        .to_string()
    }

    #[test]
    fn successful_assessment_end_to_end() {
        let llm = MockLlmClient::new(&valid_analysis());
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(5));

        let report = assessor.assess(&sample_input());

        assert_eq!(report.bmi.value, 22.86);
        assert_eq!(report.risk.level, 4);
        assert_eq!(report.risk.name, "Watch");
        assert!(!report.degraded);
        assert_eq!(report.attempts, 1);
        assert!(report.last_error.is_none());
        assert_eq!(
            report.analysis["possible_conditions"][0]["risk"],
            "medium"
        );
    }

    #[test]
    fn succeeds_on_attempt_k_after_k_minus_1_failures() {
        let llm = FailThenSucceedLlmClient::new(2, "not json at all", &valid_analysis());
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(5));

        let report = assessor.assess(&sample_input());

        assert!(!report.degraded);
        assert_eq!(report.attempts, 3);
        assert!(!report.analysis["summary"].as_str().unwrap().is_empty());
    }

    #[test]
    fn exhausted_retries_return_fallback() {
        let llm = FailThenSucceedLlmClient::new(usize::MAX, "garbage", &valid_analysis());
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(5));

        let report = assessor.assess(&sample_input());

        assert!(report.degraded);
        assert_eq!(report.attempts, 5);
        // Rule results stay intact in a degraded report.
        assert_eq!(report.risk.level, 4);
        assert!(report.analysis["summary"]
            .as_str()
            .unwrap()
            .contains("could not be generated"));
        assert!(report.analysis["error"].is_string());
        assert!(report.last_error.is_some());
    }

    #[test]
    fn exhaustion_makes_exactly_budgeted_attempts() {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));

        struct CountingBadClient(std::sync::Arc<AtomicUsize>);
        impl LlmClient for CountingBadClient {
            fn generate(&self, _: &str, _: &str, _: &str) -> Result<String, AssessmentError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok("never valid json".into())
            }
            fn is_model_available(&self, _: &str) -> Result<bool, AssessmentError> {
                Ok(true)
            }
            fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
                Ok(vec![])
            }
        }

        let assessor = HealthAssessor::new(
            Box::new(CountingBadClient(calls.clone())),
            "medgemma",
            RetryPolicy::immediate(3),
        );
        let report = assessor.assess(&sample_input());

        assert_eq!(report.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn transport_errors_surface_in_fallback() {
        let llm = ErringLlmClient {
            call_count: AtomicUsize::new(0),
        };
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(4));

        let report = assessor.assess(&sample_input());

        assert!(report.degraded);
        assert_eq!(report.attempts, 4);
        assert!(report
            .last_error
            .as_deref()
            .unwrap()
            .contains("Ollama is not running"));
    }

    #[test]
    fn fixed_delay_elapses_between_attempts() {
        let llm = FailThenSucceedLlmClient::new(usize::MAX, "garbage", "unused");
        let assessor = HealthAssessor::new(
            Box::new(llm),
            "medgemma",
            RetryPolicy::new(3, Duration::from_millis(20)),
        );

        let start = Instant::now();
        let report = assessor.assess(&sample_input());
        let elapsed = start.elapsed();

        // 3 attempts → exactly 2 inter-attempt delays.
        assert!(report.degraded);
        assert!(elapsed >= Duration::from_millis(40), "elapsed {elapsed:?}");
    }

    #[test]
    fn one_attempt_policy_never_sleeps() {
        let llm = FailThenSucceedLlmClient::new(usize::MAX, "garbage", "unused");
        let assessor = HealthAssessor::new(
            Box::new(llm),
            "medgemma",
            RetryPolicy::new(1, Duration::from_secs(60)),
        );

        let start = Instant::now();
        let report = assessor.assess(&sample_input());

        assert!(report.degraded);
        assert_eq!(report.attempts, 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn invalid_body_metrics_degrade_bmi_not_assessment() {
        let mut input = sample_input();
        input.height = 0.0;
        let llm = MockLlmClient::new(&valid_analysis());
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(5));

        let report = assessor.assess(&input);

        assert!(!report.bmi.is_valid());
        assert!(!report.degraded);
        assert_eq!(report.risk.level, 4);
    }

    #[test]
    fn ai_ready_reflects_model_availability() {
        let ready = HealthAssessor::new(
            Box::new(MockLlmClient::new("")),
            "medgemma",
            RetryPolicy::immediate(1),
        );
        assert!(ready.ai_ready());

        let unready = HealthAssessor::new(
            Box::new(MockLlmClient::new("").with_models(vec!["llama3:8b".into()])),
            "medgemma",
            RetryPolicy::immediate(1),
        );
        assert!(!unready.ai_ready());

        let erring = HealthAssessor::new(
            Box::new(ErringLlmClient {
                call_count: AtomicUsize::new(0),
            }),
            "medgemma",
            RetryPolicy::immediate(1),
        );
        assert!(!erring.ai_ready());
    }

    #[test]
    fn unconfigured_assessor_degrades_without_llm_calls() {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));

        struct CountingClient(std::sync::Arc<AtomicUsize>);
        impl LlmClient for CountingClient {
            fn generate(&self, _: &str, _: &str, _: &str) -> Result<String, AssessmentError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok("{}".into())
            }
            fn is_model_available(&self, _: &str) -> Result<bool, AssessmentError> {
                Ok(true)
            }
            fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
                Ok(vec![])
            }
        }

        let assessor = HealthAssessor::without_model(
            Box::new(CountingClient(calls.clone())),
            RetryPolicy::immediate(5),
        );

        assert!(!assessor.is_configured());
        assert!(assessor.model_name().is_none());
        assert!(!assessor.ai_ready());

        let report = assessor.assess(&sample_input());
        assert!(report.degraded);
        assert_eq!(report.attempts, 0);
        assert!(report
            .last_error
            .as_deref()
            .unwrap()
            .contains("No compatible"));
        // Rule results stay intact even with no model at all.
        assert_eq!(report.risk.level, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fenced_response_still_parses() {
        let fenced = format!("```json\n{}\n```", valid_analysis());
        let llm = MockLlmClient::new(&fenced);
        let assessor = HealthAssessor::new(Box::new(llm), "medgemma", RetryPolicy::immediate(5));

        let report = assessor.assess(&sample_input());
        assert!(!report.degraded);
        assert_eq!(report.attempts, 1);
    }
}
