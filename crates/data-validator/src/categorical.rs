//! Categorical Column Decoding

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Applicant gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// One-hot indicators as `(female, male)`
    pub fn one_hot(&self) -> [f64; 2] {
        match self {
            Gender::Female => [1.0, 0.0],
            Gender::Male => [0.0, 1.0],
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Female" => Ok(Gender::Female),
            "Male" => Ok(Gender::Male),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// Binary ownership flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Numeric encoding: yes is 1, no is 0
    pub fn encode(&self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }
}

impl FromStr for YesNo {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(YesNo::Yes),
            "No" => Ok(YesNo::No),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}
