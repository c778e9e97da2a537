//! Batch Payload Validation
//!
//! Provides structural validation, typed column extraction, and categorical
//! decoding for prediction batch payloads.

mod categorical;
mod error;
mod request;
mod validator;

pub use categorical::{Gender, YesNo};
pub use error::ValidationError;
pub use request::BatchRequest;
pub use validator::{Validator, REQUIRED_FIELDS};

/// Field name of the children count column
pub const NUM_CHILDREN: &str = "Num_Children";
/// Field name of the gender column
pub const GENDER: &str = "Gender";
/// Field name of the income column
pub const INCOME: &str = "Income";
/// Field name of the car ownership column
pub const OWN_CAR: &str = "Own_Car";
/// Field name of the housing ownership column
pub const OWN_HOUSING: &str = "Own_Housing";
