use thiserror::Error;

/// Top-level error type for the Rapport platform.
#[derive(Error, Debug)]
pub enum RapportError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
