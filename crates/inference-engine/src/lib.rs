//! Classifier Inference Engine
//!
//! Loads a pre-trained binary classifier once and runs it on feature
//! matrices.

mod classifier;
mod engine;
mod logistic;
mod onnx;

pub use classifier::{Classifier, Label};
pub use engine::{InferenceEngine, InferenceResult};
pub use logistic::{LogisticRegression, ModelArtifact};
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Classifier returned {actual} labels for {expected} rows")]
    OutputLengthMismatch { expected: usize, actual: usize },
}
