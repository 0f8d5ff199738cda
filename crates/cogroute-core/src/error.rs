use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("unknown route strategy '{0}'")]
    UnknownStrategy(String),

    #[error("context provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("context provider '{provider}' returned non-numeric value for '{key}'")]
    NonNumericContext { provider: String, key: String },

    #[error("{strategy} sink failed: {source}")]
    Sink {
        strategy: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Telemetry(#[from] cogroute_telemetry::TelemetryError),
}
