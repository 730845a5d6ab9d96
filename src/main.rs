//! Zero Trust Risk Engine
//!
//! Policy decision point for security incident telemetry: a pre-trained
//! multiclass model scores each incident over {Benign, FalsePositive,
//! TruePositive}, and a hard suspicion rule can override a permissive
//! verdict. The model can only make the outcome stricter.
//!
//! # Pipeline
//!
//! ```text
//! telemetry ──▶ encoder ──▶ classifier ──▶ label decoder ──▶ policy ──▶ response
//!                 │             │                               │
//!            encoders.json  risk_model.onnx          SuspicionLevel == "High"
//! ```

mod config;
mod engine;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "risk_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Zero Trust Risk Engine starting...");

    // Load model artifacts. A failure is not fatal: the service stays up
    // and answers 503 until artifacts are provided.
    let engine = match engine::RiskEngine::load(Path::new(&config.artifact_dir)) {
        Ok(engine) => {
            tracing::info!("Risk engine loaded successfully from {}", config.artifact_dir);
            Some(Arc::new(engine))
        }
        Err(e) => {
            tracing::error!("Risk engine not available: {}", e);
            None
        }
    };

    // Build application state
    let state = AppState {
        engine,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// None when artifact loading failed; handlers answer 503.
    pub engine: Option<Arc<engine::RiskEngine>>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict));

    // Static GUI, mounted only when the directory exists
    let frontend_dir = state.config.frontend_dir.clone();
    let frontend = Path::new(&frontend_dir);
    if frontend.is_dir() {
        app = app
            .route_service("/", ServeFile::new(frontend.join("index.html")))
            .nest_service("/static", ServeDir::new(frontend));
    } else {
        tracing::warn!(
            "frontend directory '{}' not found, GUI disabled",
            frontend_dir
        );
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::engine::test_support::{sample_encoders, FixedClassifier};
    use crate::engine::{ProbabilityDistribution, RiskEngine};

    fn state_with(probs: Option<ProbabilityDistribution>) -> AppState {
        let engine = probs.map(|p| {
            Arc::new(RiskEngine::with_classifier(
                sample_encoders(),
                Box::new(FixedClassifier(p)),
            ))
        });
        AppState {
            engine,
            config: config::Config {
                port: 0,
                artifact_dir: "artifacts".to_string(),
                frontend_dir: "frontend-test-absent".to_string(),
                environment: "test".to_string(),
            },
        }
    }

    fn telemetry_json(suspicion_level: &str) -> String {
        serde_json::json!({
            "Category": "InitialAccess",
            "MitreTechniques": "T1110",
            "ActionGrouped": "BlockedAccess",
            "EntityType": "User",
            "OSFamily": "Windows",
            "SuspicionLevel": suspicion_level,
            "CountryCode": "US",
        })
        .to_string()
    }

    async fn post_predict(state: AppState, body: String) -> (StatusCode, serde_json::Value) {
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn predict_allows_safe_telemetry() {
        let state = state_with(Some([0.95, 0.04, 0.01]));
        let (status, body) = post_predict(state, telemetry_json("Low")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "ALLOWED");
        assert_eq!(body["predicted_grade"], "Benign");
        assert!((body["confidence"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(body["breakdown"].as_object().unwrap().len(), 3);
        assert!(body["reason"]
            .as_str()
            .unwrap()
            .contains("Verified Safe"));
    }

    #[tokio::test]
    async fn predict_denies_with_full_body() {
        let state = state_with(Some([0.1, 0.1, 0.8]));
        let (status, body) = post_predict(state, telemetry_json("Low")).await;

        // Blocked, but the explanatory payload still comes through.
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["decision"], "DENIED");
        assert_eq!(body["predicted_grade"], "TruePositive");
        assert_eq!(body["reason"], "AI Block: Predicted TruePositive");
        assert!((body["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(body["breakdown"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn predict_applies_hard_suspicion_rule() {
        let state = state_with(Some([0.9, 0.07, 0.03]));
        let (status, body) = post_predict(state, telemetry_json("High")).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["reason"],
            "Policy Block: High Suspicion Input (AI predicted Benign)"
        );
    }

    #[tokio::test]
    async fn predict_unavailable_without_engine() {
        let state = state_with(None);
        let (status, body) = post_predict(state, telemetry_json("Low")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Service unavailable (Model missing)");
    }

    #[tokio::test]
    async fn predict_rejects_empty_field() {
        let state = state_with(Some([0.95, 0.04, 0.01]));
        let (status, _body) = post_predict(state, telemetry_json("")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn healthz_reports_ready_state() {
        let response = create_router(state_with(Some([0.5, 0.3, 0.2])))
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = create_router(state_with(None))
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
