use std::path::PathBuf;
use tempfile::TempDir;

pub const RECORDS_JSON: &str = r#"[
  {
    "id": "inc-1",
    "telemetry": {
      "keystrokes_per_min": 140, "mouse_moves_per_min": 200, "window_focus_changes": 3,
      "pager_events": 1, "active_tasks": 3, "idle_minutes": 5, "queue_depth": 4,
      "calendar_block_minutes": 10
    },
    "context": {"context_switches_last_hour": 2},
    "task": {"task_id": "inc-1", "severity": 4, "slo_risk_minutes": 30, "model_confidence": 0.6, "explanation": "disk filling"},
    "baseline": {"human_intervention": true}
  },
  {
    "id": "inc-2",
    "telemetry": {
      "keystrokes_per_min": 100, "mouse_moves_per_min": 160, "window_focus_changes": 1,
      "pager_events": 0, "active_tasks": 1, "idle_minutes": 12, "queue_depth": 1,
      "calendar_block_minutes": 0
    },
    "context": {"context_switches_last_hour": 0},
    "task": {"task_id": "inc-2", "severity": 1, "slo_risk_minutes": 5, "model_confidence": 0.95, "explanation": "config drift"},
    "baseline": {"human_intervention": false}
  },
  {
    "id": "inc-3",
    "telemetry": {"active_tasks": 2, "idle_minutes": 20},
    "task": {"task_id": "inc-3", "severity": 5, "slo_risk_minutes": 0, "model_confidence": 0.99},
    "baseline": {"human_intervention": true, "response_minutes": 12}
  }
]"#;

pub const GRID_JSON: &str = r#"[
  {"label": "baseline", "policy": {}},
  {"label": "strict", "policy": {"min_confidence_for_auto": 0.99}},
  {"policy": {"immediate_threshold": 0.1, "batch_threshold": 0.05}}
]"#;

pub fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
