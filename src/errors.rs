use billcycle_config::ConfigError;
use billcycle_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
}
