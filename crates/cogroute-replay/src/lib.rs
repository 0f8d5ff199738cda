//! Offline replay of routing policies over historical records

pub mod error;
pub mod evaluator;
pub mod ingest;
pub mod optimizer;
pub mod records;

pub use error::{ReplayError, Result};
pub use evaluator::{human_reduction_pct, replay, replay_with_policy, EvaluationResult};
pub use ingest::{
    convert_csv, convert_csv_reader, load_mapping, load_policy_overrides, parse_bool,
    transform_row, ColumnMapping, CsvRow, TelemetryColumns,
};
pub use optimizer::{
    compute_score, load_grid, optimize, parse_grid, CandidateResult, GridEntry, Objective,
};
pub use records::{
    load_records, parse_records, BaselineFields, HistoricalRecord, RecordEntry, TaskFields,
    TelemetryFields,
};
