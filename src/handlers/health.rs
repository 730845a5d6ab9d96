//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    timestamp: i64,
}

/// Readiness probe. Healthy only once the model artifacts are loaded;
/// orchestrators keep traffic away until then.
pub async fn check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    if state.engine.is_none() {
        return Err(AppError::ServiceUnavailable(
            "Model not initialized".to_string(),
        ));
    }

    Ok(Json(HealthResponse {
        status: "healthy",
        service: "risk-engine",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    }))
}
