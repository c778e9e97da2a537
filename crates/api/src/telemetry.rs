//! Request metrics and Prometheus export

use crate::error::StartupError;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

/// Start the Prometheus exporter on its own listener
pub fn install_exporter(listen_addr: &str) -> Result<(), StartupError> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("metrics.listen_addr {listen_addr}: {e}")))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| StartupError::Metrics(e.to_string()))?;

    describe_counter!("predict_requests_total", "Prediction requests by outcome");
    describe_histogram!("predict_duration_seconds", "End-to-end prediction latency");
    describe_histogram!("predict_batch_rows", "Rows per accepted prediction batch");

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Record one handled prediction request
pub fn record_request(outcome: &'static str, rows: Option<usize>, elapsed: Duration) {
    counter!("predict_requests_total", "outcome" => outcome).increment(1);
    histogram!("predict_duration_seconds").record(elapsed.as_secs_f64());
    if let Some(rows) = rows {
        histogram!("predict_batch_rows").record(rows as f64);
    }
}
