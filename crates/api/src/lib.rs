//! Credit Approval API Server
//!
//! Serves predictions from a pre-trained binary classifier over
//! `POST /predict`.

use axum::{routing::post, Router};
use feature_engine::FeaturePipeline;
use inference_engine::InferenceEngine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod error;
pub mod routes;
pub mod settings;
pub mod telemetry;

pub use settings::AppConfig;
pub use error::{ApiError, StartupError};

use settings::{LoggingConfig, ModelConfig};

/// Application state shared across handlers.
///
/// Immutable after startup, so handlers share it without locking.
pub struct AppState {
    /// Loaded classifier
    pub engine: InferenceEngine,
    /// Feature preparation
    pub pipeline: FeaturePipeline,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: InferenceEngine, pipeline: FeaturePipeline) -> Self {
        Self { engine, pipeline }
    }

    /// Load the model artifact and resolve its scaling source
    pub fn load(config: &ModelConfig) -> Result<Self, StartupError> {
        let engine = InferenceEngine::load(&config.path)?;
        let scaling = config.resolve_scaling(engine.embedded_scaler())?;

        info!(
            "Serving {} model from {} with {} scaling",
            engine.classifier_name(),
            engine.model_path(),
            scaling.as_str()
        );
        Ok(Self::new(engine, FeaturePipeline::new(scaling)))
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), StartupError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| StartupError::InvalidConfig(format!("unknown log level: {}", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Run the server until ctrl-c
pub async fn run_server(config: AppConfig) -> Result<(), StartupError> {
    let state = Arc::new(AppState::load(&config.model)?);

    if let Some(addr) = &config.metrics.listen_addr {
        telemetry::install_exporter(addr)?;
    }

    let app = create_router(state);

    let addr = config.server.addr;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Starting API server on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler, run until the process is killed
        std::future::pending::<()>().await;
    }
}
