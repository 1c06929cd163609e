//! The assessment endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{AssessRequest, BmiResult, RiskProfile};

#[derive(Serialize)]
pub struct UserInfo {
    pub name: String,
    pub age: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    pub weight: f64,
    pub height: f64,
}

#[derive(Serialize)]
pub struct AssessResponse {
    #[serde(rename = "userInfo")]
    pub user_info: UserInfo,
    pub bmi: BmiResult,
    #[serde(rename = "riskProfile")]
    pub risk_profile: RiskProfile,
    #[serde(rename = "aiAnalysis")]
    pub ai_analysis: serde_json::Value,
    pub degraded: bool,
    pub attempts: usize,
}

/// `POST /api/assess` — run a full assessment.
///
/// Validates required fields first (400 before any AI call), then runs the
/// blocking assessment pipeline on the blocking pool. A startup with no
/// resolved model answers 503; once configured, a transient AI failure does
/// not fail the request: the response is still 200 with a fallback analysis.
pub async fn assess(
    State(ctx): State<ApiContext>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<AssessResponse>, ApiError> {
    let input = request.validate().map_err(|missing| {
        ApiError::BadRequest(format!("Missing required fields: {}", missing.join(", ")))
    })?;

    if !ctx.assessor.is_configured() {
        return Err(ApiError::AiUnavailable);
    }

    let user_info = UserInfo {
        name: input.name.clone(),
        age: input.age,
        sex: input.sex.clone(),
        weight: input.weight,
        height: input.height,
    };

    let assessor = ctx.assessor.clone();
    let report = tokio::task::spawn_blocking(move || assessor.assess(&input))
        .await
        .map_err(|e| ApiError::Internal(format!("Assessment task failed: {e}")))?;

    Ok(Json(AssessResponse {
        user_info,
        bmi: report.bmi,
        risk_profile: report.risk,
        ai_analysis: report.analysis,
        degraded: report.degraded,
        attempts: report.attempts,
    }))
}
