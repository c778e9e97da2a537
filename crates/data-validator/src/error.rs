//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating or decoding a batch payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Parallel columns disagree on batch size
    #[error("All input lists must be of the same length.")]
    LengthMismatch,

    /// Categorical value outside the known vocabulary.
    ///
    /// The value is printed bare (`Missing field: Unknown`). Clients matching
    /// on the older quoted form (`Missing field: 'Unknown'`) need updating.
    #[error("Missing field: {0}")]
    UnknownCategory(String),

    /// Column present but not shaped as expected
    #[error("Invalid value for field {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// Body is not parseable JSON
    #[error("Invalid JSON payload: {0}")]
    MalformedJson(String),

    /// Body is JSON but not an object
    #[error("Request body must be a JSON object")]
    NotAnObject,
}
