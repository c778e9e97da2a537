//! Service configuration

use crate::error::StartupError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use feature_engine::{ScalerParams, Scaling};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix for environment overrides, e.g. `APPROVAL__SERVER__ADDR`
pub const ENV_PREFIX: &str = "APPROVAL";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where scaling parameters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Refit on every request batch
    #[default]
    PerBatch,
    /// Use parameters fixed at training time
    Fitted,
}

/// Model artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model artifact path (`.onnx` or JSON logistic regression)
    pub path: String,
    /// Scaling mode
    pub scaling: ScalingMode,
    /// JSON file with fitted scaler parameters
    pub scaler_path: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/logistic_regression.json".to_string(),
            scaling: ScalingMode::PerBatch,
            scaler_path: None,
        }
    }
}

impl ModelConfig {
    /// Decide the scaling source, given any scaler embedded in the model.
    ///
    /// In fitted mode an explicit `scaler_path` wins over the embedded
    /// scaler; having neither is a startup error.
    pub fn resolve_scaling(&self, embedded: Option<&ScalerParams>) -> Result<Scaling, StartupError> {
        match self.scaling {
            ScalingMode::PerBatch => {
                if embedded.is_some() {
                    info!("Model carries fitted scaler parameters; ignored in per_batch mode");
                }
                Ok(Scaling::PerBatch)
            }
            ScalingMode::Fitted => {
                let params = match &self.scaler_path {
                    Some(path) => load_scaler(path)?,
                    None => embedded.copied().ok_or_else(|| {
                        StartupError::InvalidConfig(
                            "fitted scaling needs model.scaler_path or a scaler embedded in the model artifact"
                                .to_string(),
                        )
                    })?,
                };

                if !params.is_valid() {
                    return Err(StartupError::InvalidConfig(
                        "scaler parameters must be finite with a positive scale".to_string(),
                    ));
                }
                Ok(Scaling::Fitted(params))
            }
        }
    }
}

fn load_scaler(path: &str) -> Result<ScalerParams, StartupError> {
    let scaler_err = |reason: String| StartupError::Scaler {
        path: path.to_string(),
        reason,
    };

    let raw = std::fs::read(path).map_err(|e| scaler_err(e.to_string()))?;
    serde_json::from_slice(&raw).map_err(|e| scaler_err(e.to_string()))
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Exporter listen address; disabled when unset
    pub listen_addr: Option<String>,
}

impl AppConfig {
    /// Load defaults, then the optional config file, then environment overrides
    pub fn load(path: Option<&str>) -> Result<Self, StartupError> {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, StartupError> {
        let config: Self = builder.build()?.try_deserialize()?;
        info!(
            "Configuration loaded (addr={}, model={}, scaling={:?})",
            config.server.addr, config.model.path, config.model.scaling
        );
        Ok(config)
    }
}
