use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::AssessmentError;

/// Models worth running assessments on, best first. Entries are bare
/// names; any installed tag of a listed model counts as a match.
const PREFERRED_MODELS: &[&str] = &["medgemma", "llama3.1", "llama3"];

/// True when `installed` is the wanted model, either untagged or as any
/// tag of it. `medgemma` accepts `medgemma:4b` but not `medgemma2:latest`.
fn matches_tag(wanted: &str, installed: &str) -> bool {
    installed == wanted
        || installed
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Pick the highest-preference model present in the installed list.
fn select_preferred(available: &[String]) -> Option<&'static str> {
    PREFERRED_MODELS
        .iter()
        .copied()
        .find(|wanted| available.iter().any(|m| matches_tag(wanted, m)))
}

/// Ollama reports failures as a JSON `{"error": "..."}` body; unwrap the
/// message when it is there, keep the raw body when it is not.
fn service_failure(status: u16, raw_body: String) -> AssessmentError {
    #[derive(Deserialize)]
    struct OllamaFailure {
        error: String,
    }

    let body = match serde_json::from_str::<OllamaFailure>(&raw_body) {
        Ok(failure) => failure.error,
        Err(_) => raw_body,
    };
    AssessmentError::AiService { status, body }
}

/// Blocking Ollama client used for the assessment call.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::blocking::Client,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        }
    }

    /// Probe the daemon and pick the best installed assessment model.
    pub fn find_best_model(&self) -> Result<String, AssessmentError> {
        let available = self.list_models()?;
        match select_preferred(&available) {
            Some(model) => {
                tracing::debug!(%model, installed = available.len(), "Assessment model selected");
                Ok(model.to_string())
            }
            None => Err(AssessmentError::NoModelAvailable),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> AssessmentError {
        if e.is_connect() {
            AssessmentError::AiConnection(self.base_url.clone())
        } else if e.is_timeout() {
            AssessmentError::HttpClient(format!(
                "No reply within {}s",
                self.timeout.as_secs()
            ))
        } else {
            AssessmentError::HttpClient(e.to_string())
        }
    }
}

/// Sampling options pinned for assessment calls: low temperature keeps
/// the analysis close to the supplied readings, and the completion cap
/// stops a rambling model from eating the whole request timeout.
#[derive(Serialize)]
struct SamplingOptions {
    temperature: f64,
    num_predict: u32,
}

const ASSESSMENT_SAMPLING: SamplingOptions = SamplingOptions {
    temperature: 0.2,
    num_predict: 1024,
};

/// Body for `POST /api/generate`. `format: "json"` makes the daemon
/// constrain decoding to valid JSON, which the downstream parser relies on.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    format: &'a str,
    options: SamplingOptions,
}

#[derive(Deserialize)]
struct GenerateAnswer {
    response: String,
}

#[derive(Deserialize)]
struct InstalledModels {
    models: Vec<InstalledModel>,
}

#[derive(Deserialize)]
struct InstalledModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, AssessmentError> {
        let request = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            format: "json",
            options: ASSESSMENT_SAMPLING,
        };

        let response = self
            .http
            .post(self.endpoint("api/generate"))
            .json(&request)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_failure(
                status.as_u16(),
                response.text().unwrap_or_default(),
            ));
        }

        let answer: GenerateAnswer = response
            .json()
            .map_err(|e| AssessmentError::ResponseParsing(e.to_string()))?;

        Ok(answer.response)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, AssessmentError> {
        let installed = self.list_models()?;
        Ok(installed.iter().any(|m| matches_tag(model, m)))
    }

    fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
        let response = self
            .http
            .get(self.endpoint("api/tags"))
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(service_failure(
                status.as_u16(),
                response.text().unwrap_or_default(),
            ));
        }

        let installed: InstalledModels = response
            .json()
            .map_err(|e| AssessmentError::ResponseParsing(e.to_string()))?;

        Ok(installed.models.into_iter().map(|m| m.name).collect())
    }
}

/// In-memory LLM client for tests: canned completion, configurable
/// installed-model list.
pub struct MockLlmClient {
    response: String,
    installed: Vec<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            installed: vec!["medgemma:4b".to_string()],
        }
    }

    pub fn with_models(mut self, installed: Vec<String>) -> Self {
        self.installed = installed;
        self
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, AssessmentError> {
        Ok(self.response.clone())
    }

    fn is_model_available(&self, model: &str) -> Result<bool, AssessmentError> {
        Ok(self.installed.iter().any(|m| matches_tag(model, m)))
    }

    fn list_models(&self) -> Result<Vec<String>, AssessmentError> {
        Ok(self.installed.clone())
    }
}
