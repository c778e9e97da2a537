//! Structural Validator for Batch Payloads

use crate::error::ValidationError;
use crate::{GENDER, INCOME, NUM_CHILDREN, OWN_CAR, OWN_HOUSING};
use serde_json::{Map, Value};
use tracing::debug;

/// Required fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 5] = [NUM_CHILDREN, GENDER, INCOME, OWN_CAR, OWN_HOUSING];

/// Structural validator for batch payloads
#[derive(Debug, Clone)]
pub struct Validator {
    required: &'static [&'static str],
}

impl Validator {
    /// Create a validator for the given required fields
    pub fn new(required: &'static [&'static str]) -> Self {
        Self { required }
    }

    /// Check that every required field is present.
    ///
    /// Reports the first missing field in declaration order.
    pub fn check_required(&self, payload: &Map<String, Value>) -> Result<(), ValidationError> {
        match self.required.iter().find(|name| !payload.contains_key(**name)) {
            Some(name) => Err(ValidationError::MissingField(*name)),
            None => Ok(()),
        }
    }

    /// Check that all array-valued fields share one length.
    ///
    /// Extra fields take part as long as they are arrays; other values are
    /// left for typed extraction to reject.
    pub fn check_lengths(&self, payload: &Map<String, Value>) -> Result<Option<usize>, ValidationError> {
        let mut expected: Option<usize> = None;

        for (name, value) in payload {
            let Some(column) = value.as_array() else {
                continue;
            };
            match expected {
                None => expected = Some(column.len()),
                Some(len) if len != column.len() => {
                    debug!(field = %name, expected = len, actual = column.len(), "Length mismatch");
                    return Err(ValidationError::LengthMismatch);
                }
                Some(_) => {}
            }
        }

        Ok(expected)
    }

    /// Run all structural checks, returning the batch size when known
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<Option<usize>, ValidationError> {
        self.check_required(payload)?;
        self.check_lengths(payload)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&REQUIRED_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn valid_payload() -> Map<String, Value> {
        payload(json!({
            "Num_Children": [1, 2],
            "Gender": ["Male", "Female"],
            "Income": [1000, 2000],
            "Own_Car": ["Yes", "No"],
            "Own_Housing": ["No", "Yes"]
        }))
    }

    #[test]
    fn test_valid_payload() {
        let validator = Validator::default();
        assert_eq!(validator.validate(&valid_payload()), Ok(Some(2)));
    }

    #[test]
    fn test_missing_field_reports_name() {
        let validator = Validator::default();
        let mut map = valid_payload();
        map.remove("Income");

        let err = validator.validate(&map).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("Income"));
        assert_eq!(err.to_string(), "Missing required field: Income");
    }

    #[test]
    fn test_first_missing_field_wins() {
        let validator = Validator::default();
        let mut map = valid_payload();
        map.remove("Own_Housing");
        map.remove("Gender");

        let err = validator.validate(&map).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: Gender");
    }

    #[test]
    fn test_length_mismatch() {
        let validator = Validator::default();
        let mut map = valid_payload();
        map.insert("Income".to_string(), json!([1000, 2000, 3000]));

        let err = validator.validate(&map).unwrap_err();
        assert_eq!(err.to_string(), "All input lists must be of the same length.");
    }

    #[test]
    fn test_extra_array_field_must_match() {
        let validator = Validator::default();
        let mut map = valid_payload();
        map.insert("Notes".to_string(), json!(["a"]));
        assert_eq!(validator.validate(&map), Err(ValidationError::LengthMismatch));
    }

    #[test]
    fn test_extra_scalar_field_ignored() {
        let validator = Validator::default();
        let mut map = valid_payload();
        map.insert("client".to_string(), json!("web"));
        assert_eq!(validator.validate(&map), Ok(Some(2)));
    }

    #[test]
    fn test_empty_batch() {
        let validator = Validator::default();
        let map = payload(json!({
            "Num_Children": [],
            "Gender": [],
            "Income": [],
            "Own_Car": [],
            "Own_Housing": []
        }));
        assert_eq!(validator.validate(&map), Ok(Some(0)));
    }

    proptest! {
        #[test]
        fn prop_mismatch_iff_lengths_differ(lengths in prop::array::uniform5(0usize..4)) {
            let map: Map<String, Value> = REQUIRED_FIELDS
                .iter()
                .zip(lengths)
                .map(|(name, len)| (name.to_string(), json!(vec![0; len])))
                .collect();

            let result = Validator::default().check_lengths(&map);
            if lengths.iter().all(|&len| len == lengths[0]) {
                prop_assert_eq!(result, Ok(Some(lengths[0])));
            } else {
                prop_assert_eq!(result, Err(ValidationError::LengthMismatch));
            }
        }
    }
}
