//! Error types for the aggregation pipeline and the report stage.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregationError>;

/// Errors raised while validating orders or deriving aggregates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// An argument or record field was rejected at the boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A customer or category is not present in the derived maps
    #[error("Key not found: {0}")]
    KeyNotFound(String),
}

/// Errors raised by a full report run, tagged by the stage that failed.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The aggregation stage failed; no report was produced
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    /// The summary could not be rendered
    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    /// The rendered report could not be written
    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Aggregation(_) => 2,
            ReportError::Render(_) | ReportError::Write { .. } => 3,
        }
    }
}
