//! Configuration for attention scoring

use serde::{Deserialize, Serialize};

/// Weights and normalization maxima for the attention model
///
/// Weights need not sum to 1; the final score is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Active task / open incident count
    pub incident_weight: f64,
    pub pager_weight: f64,
    pub queue_weight: f64,
    /// Applied to the inverted idle component
    pub idle_weight: f64,
    pub context_switch_weight: f64,
    pub calendar_weight: f64,

    pub max_active_tasks: f64,
    pub max_pager_events: f64,
    pub max_context_switches: f64,
    pub max_idle_minutes: f64,
    pub max_queue_depth: f64,
    pub max_calendar_block: f64,
}

impl AttentionConfig {
    pub fn new() -> Self {
        Self {
            incident_weight: 0.3,
            pager_weight: 0.2,
            queue_weight: 0.15,
            idle_weight: 0.15,
            context_switch_weight: 0.1,
            calendar_weight: 0.1,
            max_active_tasks: 5.0,
            max_pager_events: 4.0,
            max_context_switches: 6.0,
            max_idle_minutes: 30.0,
            max_queue_depth: 20.0,
            max_calendar_block: 90.0,
        }
    }

    /// Four-factor weighting: tasks, pager, idle and context switches only.
    /// Queue depth and calendar load are carried but contribute nothing.
    pub fn narrow() -> Self {
        Self {
            incident_weight: 0.4,
            pager_weight: 0.3,
            idle_weight: 0.2,
            context_switch_weight: 0.1,
            queue_weight: 0.0,
            calendar_weight: 0.0,
            ..Self::new()
        }
    }
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AttentionConfig::new();
        assert_eq!(config.incident_weight, 0.3);
        assert_eq!(config.max_idle_minutes, 30.0);
        assert_eq!(config.max_calendar_block, 90.0);
    }

    #[test]
    fn test_narrow_zeroes_extra_factors() {
        let config = AttentionConfig::narrow();
        assert_eq!(config.queue_weight, 0.0);
        assert_eq!(config.calendar_weight, 0.0);
        assert_eq!(config.max_queue_depth, AttentionConfig::new().max_queue_depth);
    }

    #[test]
    fn test_partial_config_json() {
        let config: AttentionConfig = serde_json::from_str(r#"{"pager_weight": 0.5}"#).unwrap();
        assert_eq!(config.pager_weight, 0.5);
        assert_eq!(config.incident_weight, 0.3);
    }
}
