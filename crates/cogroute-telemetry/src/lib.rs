//! Operator telemetry samples, rolling aggregation and periodic sampling

mod collector;
mod error;
mod io;
mod sampler;
mod types;

pub use collector::TelemetryCollector;
pub use error::{Result, TelemetryError};
pub use io::{atomic_write, read_json, write_json_pretty};
pub use sampler::{spawn_sampler, StaticTelemetrySource, TelemetrySource};
pub use types::{TelemetrySample, TelemetrySummary};
