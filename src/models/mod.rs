//! Request and response models

pub mod assessment;
pub mod telemetry;

pub use assessment::{AccessDecision, RiskAssessment};
pub use telemetry::IncidentTelemetry;
