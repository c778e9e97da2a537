//! ONNX Classifier backed by tract

use crate::classifier::{Classifier, Label};
use crate::InferenceError;
use feature_engine::{FeatureMatrix, FEATURE_DIMENSION};
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier exported to ONNX (e.g. with skl2onnx).
///
/// The plan is optimized for a single `[1, 6]` f32 row; batches are run row
/// by row and the first output is read as an integer label.
///
/// scikit-learn classifiers must be exported with the ZipMap post-processing
/// disabled, since tract has no ZipMap operator:
///
/// ```text
/// to_onnx(model, X, options={id(model): {"zipmap": False}})
/// ```
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let load_err = |e: TractError| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e));

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, FEATURE_DIMENSION)),
            )
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        info!("Loaded ONNX model from {}", path.display());
        Ok(Self { plan })
    }

    fn predict_row(&self, row: &[f32]) -> TractResult<i64> {
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], row)?;
        let outputs = self.plan.run(tvec!(input.into()))?;

        let labels = outputs[0].cast_to::<i64>()?;
        labels
            .as_slice::<i64>()?
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("model produced an empty label tensor"))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, InferenceError> {
        debug!(rows = features.rows(), "Running ONNX model");

        features
            .view()
            .rows()
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let row: Vec<f32> = row.iter().map(|&v| v as f32).collect();
                self.predict_row(&row)
                    .map(Label::Int)
                    .map_err(|e| InferenceError::InferenceFailed(format!("row {idx}: {e}")))
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}
