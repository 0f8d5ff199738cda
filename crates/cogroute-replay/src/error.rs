//! Error types for offline replay tooling

use cogroute_core::RouterError;
use cogroute_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    /// A record file or CSV row does not have the expected shape
    #[error("malformed data: {0}")]
    DataFormat(String),

    #[error("no records supplied for evaluation")]
    EmptyRecords,

    /// Grid, policy override, mapping or objective is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
