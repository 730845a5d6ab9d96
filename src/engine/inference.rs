//! Risk classifier - ONNX Runtime integration
//!
//! Runs the pre-trained multiclass model over an encoded feature vector.
//! The backend sits behind a trait so tests can inject fixed distributions.

use ndarray::Array2;
use parking_lot::RwLock;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use thiserror::Error;

use super::encoder::EncodedFeatureVector;
use super::labels::CLASS_COUNT;
use crate::models::telemetry::FIELD_COUNT;

/// Probabilities must be non-negative and sum to 1 within this tolerance.
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-4;

/// Probability per outcome class, in training index order.
pub type ProbabilityDistribution = [f32; CLASS_COUNT];

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model not found: {0}")]
    ModelMissing(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("model output error: {0}")]
    Output(String),
    #[error("malformed probability distribution: {0}")]
    BadDistribution(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Inference backend seam. Production uses [`OnnxClassifier`]; tests inject
/// canned distributions.
///
/// Implementations must be deterministic: identical input, identical output.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    fn probabilities(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<ProbabilityDistribution, InferenceError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime backed classifier.
///
/// The session needs exclusive access to run, so it sits behind a write
/// lock held for the duration of a single inference call. The model itself
/// is immutable after load.
#[derive(Debug)]
pub struct OnnxClassifier {
    session: RwLock<Session>,
}

impl OnnxClassifier {
    /// Load the model from disk.
    pub fn load(model_path: &str) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", model_path);

        if !std::path::Path::new(model_path).exists() {
            return Err(InferenceError::ModelMissing(model_path.to_string()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Session(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Session(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Session(format!("Failed to load model: {}", e)))?;

        tracing::info!("ONNX model loaded successfully");

        Ok(Self {
            session: RwLock::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn probabilities(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<ProbabilityDistribution, InferenceError> {
        let mut session_guard = self.session.write();
        let session = &mut *session_guard;

        let input_data: Vec<f32> = features.iter().map(|&code| code as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FIELD_COUNT), input_data)
            .map_err(|e| InferenceError::Session(format!("Array error: {}", e)))?;

        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| InferenceError::Output("No output defined".to_string()))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Session(format!("Tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Session(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError::Output("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Output(format!("Extract error: {}", e)))?;

        let data = output_tensor.1;
        if data.len() != CLASS_COUNT {
            return Err(InferenceError::Output(format!(
                "expected {} probabilities, model returned {}",
                CLASS_COUNT,
                data.len()
            )));
        }

        let mut probs = [0.0f32; CLASS_COUNT];
        probs.copy_from_slice(data);
        Ok(probs)
    }
}

/// Reject distributions a well-formed model cannot emit.
pub fn validate_distribution(probs: &ProbabilityDistribution) -> Result<(), InferenceError> {
    if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(InferenceError::BadDistribution(format!(
            "negative or non-finite probability in {:?}",
            probs
        )));
    }

    let sum: f32 = probs.iter().sum();
    if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(InferenceError::BadDistribution(format!(
            "probabilities sum to {}",
            sum
        )));
    }

    Ok(())
}
