//! Risk engine - the decision pipeline
//!
//! Encode -> classify -> decode -> policy -> assemble. Artifacts are loaded
//! once at startup and are immutable afterwards; every request runs the
//! same pure pipeline over them, so concurrent assessments need no
//! coordination.

pub mod encoder;
pub mod inference;
pub mod labels;
pub mod policy;

// Re-export common types
pub use encoder::{EncodedFeatureVector, FieldEncoders, Vocabulary, FALLBACK_CODE};
pub use inference::{Classifier, InferenceError, OnnxClassifier, ProbabilityDistribution};
pub use labels::{OutcomeClass, CLASS_COUNT};

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::models::assessment::RiskAssessment;
use crate::models::telemetry::IncidentTelemetry;

/// Classifier weights inside the artifact directory.
pub const MODEL_FILE: &str = "risk_model.onnx";
/// Per-field vocabularies learned at training time.
pub const ENCODERS_FILE: &str = "encoders.json";
/// Class label order fixed at training time.
pub const CLASSES_FILE: &str = "target_classes.json";

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("class order mismatch: model was trained on {expected:?}, artifacts declare {found:?}")]
    ClassOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ============================================================================
// ENGINE
// ============================================================================

/// The loaded decision pipeline: field encoders plus classifier.
///
/// Constructed once at startup and shared read-only across requests. Tests
/// build one with [`RiskEngine::with_classifier`] and a stub backend.
#[derive(Debug)]
pub struct RiskEngine {
    encoders: FieldEncoders,
    classifier: Box<dyn Classifier>,
}

impl RiskEngine {
    pub fn with_classifier(encoders: FieldEncoders, classifier: Box<dyn Classifier>) -> Self {
        Self {
            encoders,
            classifier,
        }
    }

    /// Load all artifacts from `artifact_dir`.
    ///
    /// The declared class order must match the decoder's table; a model
    /// trained against a different ordering would silently swap labels.
    pub fn load(artifact_dir: &Path) -> Result<Self, EngineError> {
        let encoders: FieldEncoders = read_json(&artifact_dir.join(ENCODERS_FILE))?;

        let declared: Vec<String> = read_json(&artifact_dir.join(CLASSES_FILE))?;
        let expected: Vec<String> = OutcomeClass::ALL
            .iter()
            .map(|class| class.as_str().to_string())
            .collect();
        if declared != expected {
            return Err(EngineError::ClassOrder {
                expected,
                found: declared,
            });
        }

        let model_path = artifact_dir.join(MODEL_FILE);
        let classifier = OnnxClassifier::load(&model_path.to_string_lossy())?;

        Ok(Self::with_classifier(encoders, Box::new(classifier)))
    }

    /// Run the full decision pipeline for one telemetry record.
    pub fn assess(&self, telemetry: &IncidentTelemetry) -> Result<RiskAssessment, InferenceError> {
        let features = self.encoders.encode_telemetry(telemetry);

        let probs = self.classifier.probabilities(&features)?;
        inference::validate_distribution(&probs)?;

        // Argmax; ties resolve to the lowest index.
        let (predicted_index, confidence) = probs
            .iter()
            .enumerate()
            .fold((0, probs[0]), |best, (index, &p)| {
                if p > best.1 {
                    (index, p)
                } else {
                    best
                }
            });
        let predicted = OutcomeClass::ALL[predicted_index];

        let verdict = policy::decide(predicted, &telemetry.suspicion_level);

        let breakdown: BTreeMap<String, f32> = OutcomeClass::ALL
            .iter()
            .zip(probs.iter())
            .map(|(class, &p)| (class.as_str().to_string(), p))
            .collect();

        Ok(RiskAssessment {
            decision: verdict.decision,
            predicted_grade: predicted.as_str().to_string(),
            confidence,
            breakdown,
            reason: verdict.reason,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let raw = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| EngineError::Parse {
        path: path.display().to_string(),
        source,
    })
}

// ============================================================================
// TEST SUPPORT
// ============================================================================


// ============================================================================
// TESTS
// ============================================================================
