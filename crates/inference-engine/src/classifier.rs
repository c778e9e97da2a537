//! Classifier Contract

use crate::InferenceError;
use feature_engine::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Class label as emitted by the trained model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

/// A pre-trained classifier.
///
/// Implementations are immutable after load and shared across requests.
pub trait Classifier: Send + Sync {
    /// Predict one label per matrix row, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, InferenceError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serialization() {
        let labels = vec![Label::Int(1), Label::Text("approved".into())];
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"[1,"approved"]"#);

        let parsed: Vec<Label> = serde_json::from_str("[0, \"denied\"]").unwrap();
        assert_eq!(parsed, vec![Label::Int(0), Label::Text("denied".into())]);
    }
}
