pub mod ollama;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod retry;
pub mod types;

pub use ollama::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use retry::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Ollama is not running at {0}")]
    AiConnection(String),

    #[error("AI service returned error (status {status}): {body}")]
    AiService { status: u16, body: String },

    #[error("No compatible assessment model available")]
    NoModelAvailable,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
