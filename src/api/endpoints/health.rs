//! Service health / readiness endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `null` when no model was resolved at startup.
    pub model: Option<String>,
    pub ai_ready: bool,
}

/// `GET /api/health` — liveness plus an AI readiness probe.
///
/// `ai_ready: false` with a model present does not take the service down:
/// `/api/assess` keeps answering with the degraded fallback path. With no
/// model at all, `/api/assess` answers 503.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let assessor = ctx.assessor.clone();
    let (model, ai_ready) = tokio::task::spawn_blocking(move || {
        (assessor.model_name().map(str::to_string), assessor.ai_ready())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Readiness probe failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model,
        ai_ready,
    }))
}
