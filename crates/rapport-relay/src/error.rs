//! Error types for the rapport-relay crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Graph error: {0}")]
    Graph(#[from] rapport_graph::GraphError),

    #[error("Snapshot store error: {0}")]
    Store(#[from] rapport_ledger::store::StoreError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rapport_core::RapportError> for RelayError {
    fn from(err: rapport_core::RapportError) -> Self {
        RelayError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
