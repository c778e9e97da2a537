//! Logistic Regression Classifier

use crate::classifier::{Classifier, Label};
use crate::InferenceError;
use feature_engine::{FeatureMatrix, ScalerParams, FEATURE_DIMENSION};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Serialized logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// One weight per feature column
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
    /// Negative class first, positive class second
    pub classes: Vec<Label>,
    /// Scaler fitted alongside the model, if exported
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
}

/// Binary logistic regression over the six-column feature matrix
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Array1<f64>,
    intercept: f64,
    classes: [Label; 2],
}

impl LogisticRegression {
    /// Create a model from raw parameters
    pub fn new(coefficients: Vec<f64>, intercept: f64, classes: Vec<Label>) -> Result<Self, InferenceError> {
        if coefficients.len() != FEATURE_DIMENSION {
            return Err(InferenceError::ModelLoadError(format!(
                "Expected {FEATURE_DIMENSION} coefficients, got {}",
                coefficients.len()
            )));
        }
        if coefficients.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(InferenceError::ModelLoadError(
                "Model parameters must be finite".to_string(),
            ));
        }

        let classes: [Label; 2] = classes.try_into().map_err(|c: Vec<Label>| {
            InferenceError::ModelLoadError(format!("Expected 2 classes, got {}", c.len()))
        })?;

        Ok(Self {
            weights: Array1::from(coefficients),
            intercept,
            classes,
        })
    }

    /// Build a model from a decoded artifact, returning any embedded scaler
    pub fn from_artifact(artifact: ModelArtifact) -> Result<(Self, Option<ScalerParams>), InferenceError> {
        if let Some(scaler) = &artifact.scaler {
            if !scaler.is_valid() {
                return Err(InferenceError::ModelLoadError(
                    "Embedded scaler has non-finite or non-positive parameters".to_string(),
                ));
            }
        }

        let model = Self::new(artifact.coefficients, artifact.intercept, artifact.classes)?;
        Ok((model, artifact.scaler))
    }

    /// Load a JSON artifact from disk
    pub fn load(path: &Path) -> Result<(Self, Option<ScalerParams>), InferenceError> {
        let raw = std::fs::read(path).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;
        let artifact: ModelArtifact = serde_json::from_slice(&raw).map_err(|e| {
            InferenceError::ModelLoadError(format!("{}: {}", path.display(), e))
        })?;

        info!(
            "Loaded logistic regression model from {} (scaler embedded: {})",
            path.display(),
            artifact.scaler.is_some()
        );
        Self::from_artifact(artifact)
    }

    /// Signed distance of each row from the decision boundary
    pub fn decision_function(&self, features: &FeatureMatrix) -> Array1<f64> {
        features.view().dot(&self.weights) + self.intercept
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Array1<f64> {
        self.decision_function(features)
            .mapv(|z| 1.0 / (1.0 + (-z).exp()))
    }

    /// Class labels, negative first
    pub fn classes(&self) -> &[Label; 2] {
        &self.classes
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, InferenceError> {
        let scores = self.decision_function(features);
        debug!(rows = scores.len(), "Scored batch");

        scores
            .iter()
            .enumerate()
            .map(|(row, &score)| {
                if !score.is_finite() {
                    return Err(InferenceError::InferenceFailed(format!(
                        "non-finite decision value at row {row}"
                    )));
                }
                let class = if score > 0.0 { 1 } else { 0 };
                Ok(self.classes[class].clone())
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> LogisticRegression {
        // Approves car owners, penalizes more children
        LogisticRegression::new(
            vec![-1.0, 0.5, 2.0, 0.5, 0.0, 0.0],
            -0.5,
            vec![Label::Int(0), Label::Int(1)],
        )
        .unwrap()
    }

    fn matrix(rows: ndarray::Array2<f64>) -> FeatureMatrix {
        FeatureMatrix::from_array(rows).unwrap()
    }

    #[test]
    fn test_predict_classes() {
        let features = matrix(array![
            [-1.0, -1.0, 1.0, 0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0, 1.0, 1.0, 0.0],
        ]);
        let labels = model().predict(&features).unwrap();
        assert_eq!(labels, vec![Label::Int(1), Label::Int(0)]);
    }

    #[test]
    fn test_predict_proba_matches_decision() {
        let features = matrix(array![[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]]);
        let model = model();
        let proba = model.predict_proba(&features);
        let expected = 1.0 / (1.0 + 0.5f64.exp());
        assert!((proba[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix() {
        let labels = model().predict(&FeatureMatrix::empty()).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_non_finite_input_fails() {
        let features = matrix(array![[f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]]);
        let err = model().predict(&features).unwrap_err();
        assert!(matches!(err, InferenceError::InferenceFailed(_)));
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let err = LogisticRegression::new(vec![1.0; 5], 0.0, vec![Label::Int(0), Label::Int(1)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Model load failed: Expected 6 coefficients, got 5");
    }

    #[test]
    fn test_wrong_class_count() {
        let err = LogisticRegression::new(vec![0.0; 6], 0.0, vec![Label::Int(1)]).unwrap_err();
        assert_eq!(err.to_string(), "Model load failed: Expected 2 classes, got 1");
    }

    #[test]
    fn test_artifact_with_scaler() {
        let artifact: ModelArtifact = serde_json::from_str(
            r#"{
                "coefficients": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
                "intercept": -0.3,
                "classes": ["denied", "approved"],
                "scaler": {
                    "Num_Children": {"mean": 0.4, "scale": 0.8},
                    "Income": {"mean": 180000.0, "scale": 95000.0}
                }
            }"#,
        )
        .unwrap();

        let (model, scaler) = LogisticRegression::from_artifact(artifact).unwrap();
        assert_eq!(model.classes()[1], Label::Text("approved".into()));
        assert_eq!(scaler.unwrap().income.mean, 180000.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LogisticRegression::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, InferenceError::ModelLoadError(_)));
    }
}
