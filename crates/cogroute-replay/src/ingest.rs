//! CSV exports to historical record files, and policy argument loading

use crate::error::{ReplayError, Result};
use crate::records::{BaselineFields, RecordEntry, TaskFields, TelemetryFields};
use cogroute_core::{PolicyOverrides, CONTEXT_SWITCHES_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Column names for each telemetry field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryColumns {
    pub keystrokes_per_min: String,
    pub mouse_moves_per_min: String,
    pub window_focus_changes: String,
    pub pager_events: String,
    pub active_tasks: String,
    pub idle_minutes: String,
    pub queue_depth: String,
    pub calendar_block_minutes: String,
}

impl Default for TelemetryColumns {
    fn default() -> Self {
        Self {
            keystrokes_per_min: "keystrokes_per_min".to_string(),
            mouse_moves_per_min: "mouse_moves_per_min".to_string(),
            window_focus_changes: "window_focus_changes".to_string(),
            pager_events: "pager_events".to_string(),
            active_tasks: "active_tasks".to_string(),
            idle_minutes: "idle_minutes".to_string(),
            queue_depth: "queue_depth".to_string(),
            calendar_block_minutes: "calendar_block_minutes".to_string(),
        }
    }
}

/// Maps record fields to CSV header names. Any field left out of a mapping
/// file keeps its canonical header name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub record_id: String,
    pub severity: String,
    pub slo_risk_minutes: String,
    pub model_confidence: String,
    pub explanation: String,
    pub sensitivity_tag: String,
    pub telemetry: TelemetryColumns,
    pub context_switches: String,
    pub baseline_flag: String,
    pub baseline_response_minutes: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            record_id: "record_id".to_string(),
            severity: "severity".to_string(),
            slo_risk_minutes: "slo_risk_minutes".to_string(),
            model_confidence: "model_confidence".to_string(),
            explanation: "explanation".to_string(),
            sensitivity_tag: "sensitivity_tag".to_string(),
            telemetry: TelemetryColumns::default(),
            context_switches: CONTEXT_SWITCHES_KEY.to_string(),
            baseline_flag: "baseline_human".to_string(),
            baseline_response_minutes: "response_minutes".to_string(),
        }
    }
}

pub fn load_mapping(path: Option<&Path>) -> Result<ColumnMapping> {
    let Some(path) = path else {
        return Ok(ColumnMapping::default());
    };
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| ReplayError::Config(format!("column mapping {}: {}", path.display(), e)))
}

/// `1`, `true`, `yes` and `y` (any case, surrounding whitespace ignored)
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        )
    })
}

pub type CsvRow = HashMap<String, String>;

fn cell<'a>(row: &'a CsvRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

/// Missing and blank cells read as 0
fn number(row: &CsvRow, column: &str) -> Result<f64> {
    match cell(row, column).map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(raw) => raw.parse().map_err(|_| {
            ReplayError::DataFormat(format!("column '{}': '{}' is not a number", column, raw))
        }),
    }
}

fn severity(row: &CsvRow, column: &str) -> Result<u8> {
    match cell(row, column).map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse().map_err(|_| {
            ReplayError::DataFormat(format!(
                "column '{}': '{}' is not a severity level",
                column, raw
            ))
        }),
    }
}

/// Convert one CSV row into a record entry
pub fn transform_row(row: &CsvRow, mapping: &ColumnMapping) -> Result<RecordEntry> {
    let columns = &mapping.telemetry;
    let telemetry = TelemetryFields {
        keystrokes_per_min: number(row, &columns.keystrokes_per_min)?,
        mouse_moves_per_min: number(row, &columns.mouse_moves_per_min)?,
        window_focus_changes: number(row, &columns.window_focus_changes)?,
        pager_events: number(row, &columns.pager_events)?,
        active_tasks: number(row, &columns.active_tasks)?,
        idle_minutes: number(row, &columns.idle_minutes)?,
        queue_depth: number(row, &columns.queue_depth)?,
        calendar_block_minutes: number(row, &columns.calendar_block_minutes)?,
    };

    let context = BTreeMap::from([(
        CONTEXT_SWITCHES_KEY.to_string(),
        number(row, &mapping.context_switches)?,
    )]);

    let task_id = cell(row, &mapping.record_id).unwrap_or("record").to_string();
    let sensitivity_tag = cell(row, &mapping.sensitivity_tag)
        .filter(|tag| !tag.is_empty())
        .unwrap_or("standard")
        .to_string();

    let task = TaskFields {
        task_id: task_id.clone(),
        severity: severity(row, &mapping.severity)?,
        slo_risk_minutes: number(row, &mapping.slo_risk_minutes)?,
        model_confidence: number(row, &mapping.model_confidence)?,
        explanation: cell(row, &mapping.explanation).unwrap_or_default().to_string(),
        sensitivity_tag: Some(sensitivity_tag),
        source: None,
    };

    let baseline = BaselineFields {
        human_intervention: parse_bool(cell(row, &mapping.baseline_flag)),
        response_minutes: Some(number(row, &mapping.baseline_response_minutes)?),
    };

    Ok(RecordEntry {
        id: Some(task_id),
        telemetry,
        context,
        task,
        baseline,
    })
}

/// Convert a headed CSV stream, one record per data row
pub fn convert_csv_reader<R: Read>(reader: R, mapping: &ColumnMapping) -> Result<Vec<RecordEntry>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let entry = transform_row(&row?, mapping).map_err(|e| match e {
            ReplayError::DataFormat(msg) => {
                ReplayError::DataFormat(format!("row {}: {}", idx + 1, msg))
            }
            other => other,
        })?;
        records.push(entry);
    }

    Ok(records)
}

pub fn convert_csv(path: &Path, mapping: &ColumnMapping) -> Result<Vec<RecordEntry>> {
    let file = std::fs::File::open(path)?;
    let records = convert_csv_reader(file, mapping)?;
    tracing::info!(path = %path.display(), count = records.len(), "converted CSV export");
    Ok(records)
}

/// Read policy overrides from a JSON file, or from the argument itself when
/// no such file exists
pub fn load_policy_overrides(arg: &str) -> Result<PolicyOverrides> {
    let path = Path::new(arg);
    let text = if path.is_file() {
        std::fs::read_to_string(path)?
    } else {
        arg.to_string()
    };

    let value: Value = serde_json::from_str(&text)
        .map_err(|e| ReplayError::Config(format!("policy is not valid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(ReplayError::Config(
            "policy must be a JSON object with RoutingPolicy fields".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| ReplayError::Config(format!("policy: {}", e)))
}
