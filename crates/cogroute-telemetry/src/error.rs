use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelemetryError>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("sample at {sample} is older than the latest recorded sample at {latest}")]
    OutOfOrder {
        sample: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    #[error("telemetry source failed: {0}")]
    Source(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
