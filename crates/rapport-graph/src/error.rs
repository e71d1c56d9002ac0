//! Error types for the rapport-graph crate.
//!
//! Normalization and updates never fail; only loading the initial graph can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid relation row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
