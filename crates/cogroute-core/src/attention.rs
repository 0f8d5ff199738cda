//! Operator attention-load scoring

use crate::config::AttentionConfig;
use crate::context::ContextSnapshot;
use cogroute_telemetry::TelemetrySummary;

pub const CONTEXT_SWITCHES_KEY: &str = "context_switches_last_hour";
pub const QUEUE_DEPTH_KEY: &str = "queue_depth";
pub const CALENDAR_BLOCK_KEY: &str = "calendar_block_minutes";

/// Clamp to [0, 1], mapping NaN to 0
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn normalize(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    clamp_unit(value / max)
}

/// Collapses telemetry and context signals into one load score in [0, 1]
#[derive(Debug, Clone, Default)]
pub struct AttentionModel {
    config: AttentionConfig,
}

impl AttentionModel {
    pub fn new(config: AttentionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }

    /// Each signal is normalized against its maximum and clamped; idle time is
    /// inverted. Only the weighted sum is clamped at the end.
    pub fn score(&self, summary: &TelemetrySummary, context: &ContextSnapshot) -> f64 {
        let c = &self.config;

        let context_switches = context.get(CONTEXT_SWITCHES_KEY).copied().unwrap_or(0.0);
        let queue_depth = context
            .get(QUEUE_DEPTH_KEY)
            .copied()
            .unwrap_or(summary.queue_depth);
        let calendar_block = context
            .get(CALENDAR_BLOCK_KEY)
            .copied()
            .unwrap_or(summary.calendar_block_minutes);

        let incident = normalize(summary.active_tasks, c.max_active_tasks);
        let pager = normalize(summary.pager_events, c.max_pager_events);
        let idle = 1.0 - normalize(summary.idle_minutes, c.max_idle_minutes);
        let switches = normalize(context_switches, c.max_context_switches);
        let queue = normalize(queue_depth, c.max_queue_depth);
        let calendar = normalize(calendar_block, c.max_calendar_block);

        let score = incident * c.incident_weight
            + pager * c.pager_weight
            + queue * c.queue_weight
            + idle * c.idle_weight
            + switches * c.context_switch_weight
            + calendar * c.calendar_weight;

        clamp_unit(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(active_tasks: f64, pager_events: f64, idle_minutes: f64) -> TelemetrySummary {
        TelemetrySummary {
            avg_keystrokes: 100.0,
            avg_mouse_moves: 150.0,
            window_changes: 2.0,
            pager_events,
            active_tasks,
            idle_minutes,
            queue_depth: 0.0,
            calendar_block_minutes: 0.0,
        }
    }

    fn switches(count: f64) -> ContextSnapshot {
        ContextSnapshot::from([(CONTEXT_SWITCHES_KEY.to_string(), count)])
    }

    #[test]
    fn test_score_increases_with_load() {
        let model = AttentionModel::default();
        let low = model.score(&summary(1.0, 0.0, 8.0), &switches(0.0));
        let high = model.score(&summary(5.0, 4.0, 0.0), &switches(6.0));
        assert!(high > low);
        assert!((0.0..=1.0).contains(&high));
    }

    #[test]
    fn test_empty_summary_counts_as_zero_idle() {
        // Zero idle minutes reads as fully engaged
        let model = AttentionModel::default();
        let score = model.score(&TelemetrySummary::default(), &ContextSnapshot::new());
        assert!((score - 0.15).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_sum_clamped_not_terms() {
        let config = AttentionConfig {
            incident_weight: 2.0,
            pager_weight: 2.0,
            ..AttentionConfig::new()
        };
        let model = AttentionModel::new(config);
        let score = model.score(&summary(10.0, 10.0, 0.0), &switches(100.0));
        assert_eq!(score, 1.0);

        // A half-saturated single term still contributes its full weighted share
        let config = AttentionConfig {
            incident_weight: 1.5,
            pager_weight: 0.0,
            queue_weight: 0.0,
            idle_weight: 0.0,
            context_switch_weight: 0.0,
            calendar_weight: 0.0,
            ..AttentionConfig::new()
        };
        let model = AttentionModel::new(config);
        let score = model.score(&summary(2.5, 0.0, 30.0), &ContextSnapshot::new());
        assert!((score - 0.75).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_monotonic_in_each_load_signal() {
        let model = AttentionModel::default();
        let base = model.score(&summary(2.0, 1.0, 10.0), &switches(2.0));

        assert!(model.score(&summary(3.0, 1.0, 10.0), &switches(2.0)) >= base);
        assert!(model.score(&summary(2.0, 2.0, 10.0), &switches(2.0)) >= base);
        assert!(model.score(&summary(2.0, 1.0, 10.0), &switches(3.0)) >= base);
        assert!(model.score(&summary(2.0, 1.0, 20.0), &switches(2.0)) <= base);
    }

    #[test]
    fn test_context_overrides_summary_queue() {
        let model = AttentionModel::default();
        let mut telemetry = summary(1.0, 0.0, 10.0);
        telemetry.queue_depth = 20.0;

        let from_summary = model.score(&telemetry, &ContextSnapshot::new());
        let overridden = model.score(
            &telemetry,
            &ContextSnapshot::from([(QUEUE_DEPTH_KEY.to_string(), 0.0)]),
        );
        assert!((from_summary - overridden - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_config_ignores_queue_and_calendar() {
        let model = AttentionModel::new(AttentionConfig::narrow());
        let quiet = model.score(&summary(1.0, 1.0, 5.0), &ContextSnapshot::new());
        let busy = model.score(
            &summary(1.0, 1.0, 5.0),
            &ContextSnapshot::from([
                (QUEUE_DEPTH_KEY.to_string(), 50.0),
                (CALENDAR_BLOCK_KEY.to_string(), 90.0),
            ]),
        );
        assert_eq!(quiet, busy);
    }

    #[test]
    fn test_degenerate_inputs_stay_in_range() {
        let config = AttentionConfig {
            max_active_tasks: 0.0,
            ..AttentionConfig::new()
        };
        let model = AttentionModel::new(config);
        let score = model.score(&summary(f64::NAN, -3.0, -10.0), &switches(f64::INFINITY));
        assert!((0.0..=1.0).contains(&score));
    }
}
