use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wellcheck::api::server::start_api_server;
use wellcheck::api::types::ApiContext;
use wellcheck::assessment::{HealthAssessor, OllamaClient, RetryPolicy};
use wellcheck::config::{self, AppConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = AppConfig::from_env();

    // The blocking HTTP client lives off the async runtime; build it and
    // resolve the model on the blocking pool. A missing daemon or model is
    // a degraded start, not a fatal one.
    let configured = app_config.model.clone();
    let ollama_url = app_config.ollama_url.clone();
    let timeout_secs = app_config.ai_timeout_secs;
    let (client, model) = tokio::task::spawn_blocking(move || {
        let client = OllamaClient::new(&ollama_url, timeout_secs);
        let resolved = match configured {
            Some(model) => Ok(model),
            None => client.find_best_model(),
        };
        (client, resolved)
    })
    .await
    .expect("model resolution task panicked");

    let retry = RetryPolicy::new(app_config.ai_max_attempts, app_config.ai_retry_delay);
    let assessor = match model {
        Ok(model) => {
            tracing::info!(%model, ollama_url = %app_config.ollama_url, "AI backend configured");
            HealthAssessor::new(Box::new(client), &model, retry)
        }
        Err(e) => {
            tracing::warn!(error = %e, "No assessment model resolved; /api/assess will answer 503 until a model is installed and the service restarted");
            HealthAssessor::without_model(Box::new(client), retry)
        }
    };

    let ctx = ApiContext::new(Arc::new(assessor));

    let mut server = match start_api_server(ctx, app_config.bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start API server");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %server.session.server_addr, "Ready to accept assessments");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }

    tracing::info!("Shutting down");
    server.shutdown();
}
