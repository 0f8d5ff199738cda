#![allow(dead_code)]

use chrono::{Duration, Utc};
use cogroute_core::{AttentionModel, RouterService, RoutingPolicy};
use cogroute_telemetry::{TelemetryCollector, TelemetrySample};
use std::sync::Arc;

pub fn sample(minutes_ago: i64, active_tasks: u32, pager_events: u32) -> TelemetrySample {
    TelemetrySample {
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        keystrokes_per_min: 120.0,
        mouse_moves_per_min: 180.0,
        window_focus_changes: 2,
        pager_events,
        active_tasks,
        idle_minutes: 4.0,
        queue_depth: 0,
        calendar_block_minutes: 0.0,
    }
}

pub fn busy_collector() -> Arc<TelemetryCollector> {
    let collector = Arc::new(TelemetryCollector::default());
    for minutes_ago in [20, 10, 0] {
        collector.record_sample(sample(minutes_ago, 4, 3)).unwrap();
    }
    collector
}

pub fn sample_router() -> RouterService {
    RouterService::new(
        busy_collector(),
        AttentionModel::default(),
        RoutingPolicy::default(),
    )
}

pub const RECORDS_JSON: &str = r#"[
  {"id": "inc-1",
   "telemetry": {"pager_events": 1, "active_tasks": 3, "idle_minutes": 5, "queue_depth": 4, "calendar_block_minutes": 10},
   "context": {"context_switches_last_hour": 2},
   "task": {"task_id": "inc-1", "severity": 4, "slo_risk_minutes": 30, "model_confidence": 0.6},
   "baseline": {"human_intervention": true}},
  {"id": "inc-2",
   "telemetry": {"active_tasks": 1, "idle_minutes": 12, "queue_depth": 1},
   "task": {"task_id": "inc-2", "severity": 1, "slo_risk_minutes": 5, "model_confidence": 0.95},
   "baseline": {"human_intervention": false}}
]"#;
