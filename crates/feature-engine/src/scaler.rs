//! Standard-Score Scaling

use data_validator::BatchRequest;
use serde::{Deserialize, Serialize};

/// Standard deviations below this are treated as zero
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Per-column standard-score transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column mean
    pub mean: f64,
    /// Column standard deviation (population)
    pub scale: f64,
}

impl StandardScaler {
    /// Transform that leaves values unchanged
    pub fn identity() -> Self {
        Self {
            mean: 0.0,
            scale: 1.0,
        }
    }

    /// Fit on a single column.
    ///
    /// A constant column gets a scale of 1.0 so every value maps to 0.0.
    /// An empty column fits to the identity.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::identity();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        Self {
            mean,
            scale: if std_dev < MIN_SCALE { 1.0 } else { std_dev },
        }
    }

    /// Transform one value
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    /// Whether the parameters describe a usable transform
    pub fn is_valid(&self) -> bool {
        self.mean.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::identity()
    }
}

/// Scaling parameters for both numeric columns
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScalerParams {
    #[serde(rename = "Num_Children")]
    pub num_children: StandardScaler,
    #[serde(rename = "Income")]
    pub income: StandardScaler,
}

impl ScalerParams {
    /// Fit both columns on a batch, each column independently
    pub fn fit(batch: &BatchRequest) -> Self {
        Self {
            num_children: StandardScaler::fit(&batch.num_children),
            income: StandardScaler::fit(&batch.income),
        }
    }

    /// Whether both column transforms are usable
    pub fn is_valid(&self) -> bool {
        self.num_children.is_valid() && self.income.is_valid()
    }
}

/// Where scaling parameters come from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scaling {
    /// Refit on every incoming batch
    #[default]
    PerBatch,
    /// Parameters fixed at training time
    Fitted(ScalerParams),
}

impl Scaling {
    /// Parameters to apply to this batch
    pub fn params_for(&self, batch: &BatchRequest) -> ScalerParams {
        match self {
            Scaling::PerBatch => ScalerParams::fit(batch),
            Scaling::Fitted(params) => *params,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Scaling::PerBatch => "per_batch",
            Scaling::Fitted(_) => "fitted",
        }
    }
}
