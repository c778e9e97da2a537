//! Feature Matrix Assembly

use crate::scaler::Scaling;
use crate::scaler::StandardScaler;
use data_validator::{BatchRequest, Gender, ValidationError, YesNo, INCOME, NUM_CHILDREN};
use ndarray::{Array2, ArrayView1, ArrayView2};
use tracing::debug;

/// Number of columns in the feature matrix
pub const FEATURE_DIMENSION: usize = 6;

/// Column names, in matrix order
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "Num_Children",
    "Income",
    "Own_Car",
    "Own_Housing",
    "Gender_Female",
    "Gender_Male",
];

/// Numeric N×6 matrix, one row per sample in input order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Matrix with no rows
    pub fn empty() -> Self {
        Self {
            values: Array2::zeros((0, FEATURE_DIMENSION)),
        }
    }

    /// Wrap an existing array. Returns `None` unless it has six columns.
    pub fn from_array(values: Array2<f64>) -> Option<Self> {
        (values.ncols() == FEATURE_DIMENSION).then_some(Self { values })
    }

    /// Number of samples
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Whether the matrix holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// One sample's features
    pub fn row(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(idx)
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }
}

/// Builds feature matrices from validated batches
#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    scaling: Scaling,
}

impl FeaturePipeline {
    /// Create a pipeline with the given scaling source
    pub fn new(scaling: Scaling) -> Self {
        Self { scaling }
    }

    /// Build the feature matrix for a batch.
    ///
    /// Either every row is produced or the whole batch fails on the first
    /// bad value. Numeric columns are scaled first, then `Own_Car`,
    /// `Own_Housing` and `Gender` are decoded in that order.
    pub fn prepare(&self, batch: &BatchRequest) -> Result<FeatureMatrix, ValidationError> {
        let n = batch.len();
        let lengths = [
            batch.gender.len(),
            batch.income.len(),
            batch.own_car.len(),
            batch.own_housing.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(ValidationError::LengthMismatch);
        }

        if n == 0 {
            debug!("Empty batch, skipping scaling");
            return Ok(FeatureMatrix::empty());
        }

        let params = self.scaling.params_for(batch);
        check_scaler(NUM_CHILDREN, &params.num_children)?;
        check_scaler(INCOME, &params.income)?;

        let own_car = decode::<YesNo>(&batch.own_car)?;
        let own_housing = decode::<YesNo>(&batch.own_housing)?;
        let gender = decode::<Gender>(&batch.gender)?;

        let values = Array2::from_shape_fn((n, FEATURE_DIMENSION), |(row, col)| match col {
            0 => params.num_children.transform(batch.num_children[row]),
            1 => params.income.transform(batch.income[row]),
            2 => own_car[row].encode(),
            3 => own_housing[row].encode(),
            4 => gender[row].one_hot()[0],
            _ => gender[row].one_hot()[1],
        });

        for (field, col) in [(NUM_CHILDREN, 0), (INCOME, 1)] {
            if values.column(col).iter().any(|v| !v.is_finite()) {
                return Err(unrepresentable(field));
            }
        }

        debug!(
            rows = n,
            columns = ?FEATURE_NAMES,
            scaling = self.scaling.as_str(),
            "Prepared feature matrix"
        );

        Ok(FeatureMatrix { values })
    }
}

fn unrepresentable(field: &'static str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        reason: "not representable after scaling".to_string(),
    }
}

/// Sums or squares past `f64::MAX` leave a non-finite mean or scale
fn check_scaler(field: &'static str, scaler: &StandardScaler) -> Result<(), ValidationError> {
    if scaler.is_valid() {
        Ok(())
    } else {
        Err(unrepresentable(field))
    }
}

fn decode<T>(raw: &[String]) -> Result<Vec<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    raw.iter().map(|value| value.parse()).collect()
}
