//! Historical record file format

use crate::error::{ReplayError, Result};
use chrono::{DateTime, Utc};
use cogroute_core::{ContextSnapshot, TaskIntent};
use cogroute_telemetry::TelemetrySample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Telemetry summary as stored in a record; missing fields read as 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryFields {
    pub keystrokes_per_min: f64,
    pub mouse_moves_per_min: f64,
    pub window_focus_changes: f64,
    pub pager_events: f64,
    pub active_tasks: f64,
    pub idle_minutes: f64,
    pub queue_depth: f64,
    pub calendar_block_minutes: f64,
}

impl TelemetryFields {
    /// Single synthetic sample carrying these values; counts are truncated
    pub fn to_sample(&self, timestamp: DateTime<Utc>) -> TelemetrySample {
        TelemetrySample {
            timestamp,
            keystrokes_per_min: self.keystrokes_per_min,
            mouse_moves_per_min: self.mouse_moves_per_min,
            window_focus_changes: self.window_focus_changes as u32,
            pager_events: self.pager_events as u32,
            active_tasks: self.active_tasks as u32,
            idle_minutes: self.idle_minutes,
            queue_depth: self.queue_depth as u32,
            calendar_block_minutes: self.calendar_block_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFields {
    pub task_id: String,
    pub severity: u8,
    pub slo_risk_minutes: f64,
    pub model_confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl TaskFields {
    pub fn to_intent(&self) -> TaskIntent {
        let mut task = TaskIntent::new(
            self.task_id.clone(),
            self.severity,
            self.slo_risk_minutes,
            self.model_confidence,
            self.explanation.clone(),
        );
        if let Some(tag) = &self.sensitivity_tag {
            task = task.with_sensitivity(tag.clone());
        }
        if let Some(source) = &self.source {
            task = task.with_source(source.clone());
        }
        task
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineFields {
    /// Whether a human handled the task historically
    #[serde(default = "default_human_intervention")]
    pub human_intervention: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_minutes: Option<f64>,
}

fn default_human_intervention() -> bool {
    true
}

impl Default for BaselineFields {
    fn default() -> Self {
        Self {
            human_intervention: default_human_intervention(),
            response_minutes: None,
        }
    }
}

/// One element of a historical record file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub telemetry: TelemetryFields,
    #[serde(default)]
    pub context: BTreeMap<String, f64>,
    pub task: TaskFields,
    #[serde(default)]
    pub baseline: BaselineFields,
}

/// A record ready for replay
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub id: String,
    pub telemetry: TelemetryFields,
    pub context: ContextSnapshot,
    pub task: TaskIntent,
    pub baseline_human: bool,
    pub baseline_response_minutes: Option<f64>,
}

impl From<RecordEntry> for HistoricalRecord {
    fn from(entry: RecordEntry) -> Self {
        let task = entry.task.to_intent();
        Self {
            id: entry.id.unwrap_or_else(|| task.task_id.clone()),
            telemetry: entry.telemetry,
            context: entry.context.into_iter().collect(),
            task,
            baseline_human: entry.baseline.human_intervention,
            baseline_response_minutes: entry.baseline.response_minutes,
        }
    }
}

/// Parse a JSON array of records. Any malformed entry fails the whole load.
pub fn parse_records(text: &str) -> Result<Vec<HistoricalRecord>> {
    let entries: Vec<RecordEntry> = serde_json::from_str(text)
        .map_err(|e| ReplayError::DataFormat(format!("historical records: {}", e)))?;
    Ok(entries.into_iter().map(HistoricalRecord::from).collect())
}

pub fn load_records(path: &Path) -> Result<Vec<HistoricalRecord>> {
    let text = std::fs::read_to_string(path)?;
    let records = parse_records(&text)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}
