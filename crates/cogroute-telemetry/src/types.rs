//! Telemetry record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time measurement of operator interaction and workload signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub timestamp: DateTime<Utc>,
    pub keystrokes_per_min: f64,
    pub mouse_moves_per_min: f64,
    pub window_focus_changes: u32,
    pub pager_events: u32,
    pub active_tasks: u32,
    pub idle_minutes: f64,
    #[serde(default)]
    pub queue_depth: u32,
    #[serde(default)]
    pub calendar_block_minutes: f64,
}

/// Aggregate view over the collector's retained window
///
/// Rates are averaged across the window. Idle minutes, queue depth and
/// calendar-blocked minutes are instantaneous state and always come from the
/// most recent sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySummary {
    pub avg_keystrokes: f64,
    pub avg_mouse_moves: f64,
    pub window_changes: f64,
    pub pager_events: f64,
    pub active_tasks: f64,
    pub idle_minutes: f64,
    pub queue_depth: f64,
    pub calendar_block_minutes: f64,
}
