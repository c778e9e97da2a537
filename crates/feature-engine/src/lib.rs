//! Feature Engineering Engine
//!
//! Turns validated batch requests into the numeric feature matrix consumed
//! by the classifier.

mod features;
mod scaler;

pub use features::{FeatureMatrix, FeaturePipeline, FEATURE_DIMENSION, FEATURE_NAMES};
pub use scaler::{ScalerParams, Scaling, StandardScaler};
