//! Error types for event and workflow delivery

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to encode event: {0}")]
    Encode(String),

    #[error("failed to decode message on '{topic}': {reason}")]
    Decode { topic: String, reason: String },

    #[error("transport {operation} failed")]
    Transport {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("workflow '{workflow}' did not start for task {task_id}")]
    Workflow {
        workflow: String,
        task_id: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, DispatchError>;
