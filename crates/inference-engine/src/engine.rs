//! Inference Engine Implementation

use crate::classifier::{Classifier, Label};
use crate::logistic::LogisticRegression;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use feature_engine::{FeatureMatrix, ScalerParams};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// One label per input row, in row order
    pub labels: Vec<Label>,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

/// Shared, read-only handle to a loaded classifier
#[derive(Clone)]
pub struct InferenceEngine {
    /// Loaded classifier
    classifier: Arc<dyn Classifier>,
    /// Model path
    model_path: String,
    /// Scaler exported with the model, if any
    embedded_scaler: Option<ScalerParams>,
}

impl InferenceEngine {
    /// Load a model artifact.
    ///
    /// `.onnx` files go through tract; anything else is read as a JSON
    /// logistic regression artifact.
    pub fn load(model_path: &str) -> Result<Self, InferenceError> {
        info!("Loading model artifact: {}", model_path);
        let path = Path::new(model_path);

        let is_onnx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));

        let (classifier, embedded_scaler) = if is_onnx {
            let model: Arc<dyn Classifier> = Arc::new(OnnxClassifier::load(path)?);
            (model, None)
        } else {
            let (model, scaler) = LogisticRegression::load(path)?;
            (Arc::new(model) as Arc<dyn Classifier>, scaler)
        };

        info!("Model ready ({})", classifier.name());
        Ok(Self {
            classifier,
            model_path: model_path.to_string(),
            embedded_scaler,
        })
    }

    /// Wrap an already constructed classifier
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            model_path: "in-memory".to_string(),
            embedded_scaler: None,
        }
    }

    /// Run inference on a feature matrix.
    ///
    /// The classifier runs on the blocking pool. An empty matrix returns no
    /// labels without touching the classifier.
    pub async fn predict(&self, features: FeatureMatrix) -> Result<InferenceResult, InferenceError> {
        let start = std::time::Instant::now();
        let rows = features.rows();

        if rows == 0 {
            return Ok(InferenceResult {
                labels: Vec::new(),
                latency_ms: 0,
            });
        }

        let classifier = Arc::clone(&self.classifier);
        let labels = tokio::task::spawn_blocking(move || classifier.predict(&features))
            .await
            .map_err(|e| InferenceError::InferenceFailed(format!("inference task failed: {e}")))??;

        if labels.len() != rows {
            return Err(InferenceError::OutputLengthMismatch {
                expected: rows,
                actual: labels.len(),
            });
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!("Inference completed in {}ms for {} rows", latency_ms, rows);

        Ok(InferenceResult { labels, latency_ms })
    }

    /// Scaler exported with the model, if any
    pub fn embedded_scaler(&self) -> Option<&ScalerParams> {
        self.embedded_scaler.as_ref()
    }

    /// Name of the loaded classifier
    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Get model path
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}
