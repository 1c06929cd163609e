use std::net::SocketAddr;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Wellcheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Runtime configuration, read from the environment with sane defaults.
///
/// - `WELLCHECK_ADDR` — socket address to bind (default `127.0.0.1:8787`)
/// - `WELLCHECK_OLLAMA_URL` — Ollama base URL (default `http://localhost:11434`)
/// - `WELLCHECK_MODEL` — model override; when unset the preferred-model
///   list is probed at startup
/// - `WELLCHECK_AI_TIMEOUT_SECS` — per-call timeout (default 120)
/// - `WELLCHECK_AI_RETRIES` — retry budget for the AI call (default 5)
/// - `WELLCHECK_AI_RETRY_DELAY_SECS` — fixed inter-attempt delay (default 2)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub ollama_url: String,
    pub model: Option<String>,
    pub ai_timeout_secs: u64,
    pub ai_max_attempts: usize,
    pub ai_retry_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".parse().expect("valid default address"),
            ollama_url: "http://localhost:11434".to_string(),
            model: None,
            ai_timeout_secs: 120,
            ai_max_attempts: 5,
            ai_retry_delay: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    /// Build configuration from the environment. Unparseable values fall
    /// back to the defaults with a warning rather than aborting startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match std::env::var("WELLCHECK_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(%raw, "Invalid WELLCHECK_ADDR, using default");
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        let ollama_url = std::env::var("WELLCHECK_OLLAMA_URL")
            .unwrap_or_else(|_| defaults.ollama_url.clone());

        let model = std::env::var("WELLCHECK_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty());

        Self {
            bind_addr,
            ollama_url,
            model,
            ai_timeout_secs: env_u64("WELLCHECK_AI_TIMEOUT_SECS", defaults.ai_timeout_secs),
            ai_max_attempts: env_u64("WELLCHECK_AI_RETRIES", defaults.ai_max_attempts as u64)
                as usize,
            ai_retry_delay: Duration::from_secs(env_u64(
                "WELLCHECK_AI_RETRY_DELAY_SECS",
                defaults.ai_retry_delay.as_secs(),
            )),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, %raw, "Invalid numeric env var, using default");
            default
        }),
        Err(_) => default,
    }
}
