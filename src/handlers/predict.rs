//! Risk decision handler

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::models::{IncidentTelemetry, RiskAssessment};
use crate::{AppError, AppResult, AppState};

/// Run the decision pipeline for one incident.
///
/// DENIED is a normal outcome, not a failure: it is delivered as 403 with
/// the complete assessment attached so the blocked party sees exactly why.
pub async fn predict(
    State(state): State<AppState>,
    Json(telemetry): Json<IncidentTelemetry>,
) -> AppResult<(StatusCode, Json<RiskAssessment>)> {
    telemetry
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let engine = state.engine.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Service unavailable (Model missing)".to_string())
    })?;

    let assessment = engine.assess(&telemetry)?;

    let status = if assessment.decision.is_denied() {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::OK
    };

    Ok((status, Json(assessment)))
}
