//! Prediction Route

use axum::{body::Bytes, extract::State, Json};
use data_validator::BatchRequest;
use inference_engine::Label;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::telemetry;
use crate::AppState;

/// Response for predict endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// One label per input sample, in input order
    pub predictions: Vec<Label>,
}

/// Score a batch of applicants.
///
/// The body is parsed as JSON whatever its content type.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    match score(&state, &body).await {
        Ok(predictions) => {
            telemetry::record_request("ok", Some(predictions.len()), start.elapsed());
            Ok(Json(PredictResponse { predictions }))
        }
        Err(e) => {
            telemetry::record_request(e.outcome(), None, start.elapsed());
            Err(e)
        }
    }
}

async fn score(state: &AppState, body: &[u8]) -> Result<Vec<Label>, ApiError> {
    let batch = BatchRequest::from_json(body)?;
    let features = state.pipeline.prepare(&batch)?;
    let result = state.engine.predict(features).await?;

    debug!(
        "Predicted {} rows in {}ms",
        result.labels.len(),
        result.latency_ms
    );
    Ok(result.labels)
}
