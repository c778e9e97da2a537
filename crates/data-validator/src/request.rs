//! Typed Batch Extraction

use crate::error::ValidationError;
use crate::validator::Validator;
use crate::{GENDER, INCOME, NUM_CHILDREN, OWN_CAR, OWN_HOUSING};
use serde_json::{Map, Value};

/// A validated batch of samples as parallel columns.
///
/// Categorical columns keep their raw text; decoding into [`crate::Gender`]
/// and [`crate::YesNo`] happens during feature preparation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRequest {
    pub num_children: Vec<f64>,
    pub gender: Vec<String>,
    pub income: Vec<f64>,
    pub own_car: Vec<String>,
    pub own_housing: Vec<String>,
}

impl BatchRequest {
    /// Parse and validate a raw request body
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::MalformedJson(e.to_string()))?;

        match value {
            Value::Object(payload) => Self::from_payload(&payload),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Validate a decoded payload and extract its typed columns
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ValidationError> {
        Validator::default().validate(payload)?;

        let num_children = numeric_column(payload, NUM_CHILDREN)?;
        let income = numeric_column(payload, INCOME)?;
        let own_car = text_column(payload, OWN_CAR)?;
        let own_housing = text_column(payload, OWN_HOUSING)?;
        let gender = text_column(payload, GENDER)?;

        Ok(Self {
            num_children,
            gender,
            income,
            own_car,
            own_housing,
        })
    }

    /// Number of samples in the batch
    pub fn len(&self) -> usize {
        self.num_children.len()
    }

    /// Whether the batch holds no samples
    pub fn is_empty(&self) -> bool {
        self.num_children.is_empty()
    }
}

fn array<'a>(payload: &'a Map<String, Value>, field: &'static str) -> Result<&'a [Value], ValidationError> {
    match payload.get(field) {
        Some(Value::Array(values)) => Ok(values.as_slice()),
        Some(other) => Err(ValidationError::InvalidValue {
            field,
            reason: format!("expected an array, got {other}"),
        }),
        None => Err(ValidationError::MissingField(field)),
    }
}

fn numeric_column(payload: &Map<String, Value>, field: &'static str) -> Result<Vec<f64>, ValidationError> {
    array(payload, field)?
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            value.as_f64().ok_or_else(|| ValidationError::InvalidValue {
                field,
                reason: format!("expected a number at index {idx}, got {value}"),
            })
        })
        .collect()
}

/// Non-string entries keep their JSON text so they fail category lookup
/// with the offending value.
fn text_column(payload: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    Ok(array(payload, field)?
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}
