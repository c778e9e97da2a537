//! Error envelopes for the HTTP boundary and process startup

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Request-level failure, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad input (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Classifier failure (500)
    #[error("Prediction error: {0}")]
    Inference(#[from] InferenceError),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Outcome label used in request metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid",
            Self::Inference(_) => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(e) => warn!("Rejected prediction request: {}", e),
            Self::Inference(e) => error!("Prediction failed: {}", e),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Conditions that keep the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Model(#[from] InferenceError),

    #[error("Failed to read scaler parameters from {path}: {reason}")]
    Scaler { path: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to install metrics exporter: {0}")]
    Metrics(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
