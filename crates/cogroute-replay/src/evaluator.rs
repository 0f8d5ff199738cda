//! Offline policy evaluation against historical records

use crate::error::{ReplayError, Result};
use crate::records::HistoricalRecord;
use chrono::Utc;
use cogroute_core::{AttentionModel, PolicyOverrides, RouteStrategy, RouterService, RoutingPolicy};
use cogroute_telemetry::TelemetryCollector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Aggregate outcome of replaying one policy over a record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub policy_label: String,
    pub total_tasks: usize,
    /// Every strategy is present, including those with a zero count
    pub strategy_counts: BTreeMap<RouteStrategy, usize>,
    pub average_priority: f64,
    pub average_attention_load: f64,
    pub baseline_human_rate: f64,
    pub router_human_rate: f64,
    pub human_reduction_pct: f64,
}

impl EvaluationResult {
    pub fn count(&self, strategy: RouteStrategy) -> usize {
        self.strategy_counts.get(&strategy).copied().unwrap_or(0)
    }
}

/// Percentage drop from the baseline rate; 0 when the baseline is 0
pub fn human_reduction_pct(baseline_rate: f64, router_rate: f64) -> f64 {
    if baseline_rate == 0.0 {
        return 0.0;
    }
    (baseline_rate - router_rate) / baseline_rate * 100.0
}

/// Replay with the default attention model and the given overrides
/// applied to the default policy.
pub fn replay(
    records: &[HistoricalRecord],
    overrides: Option<&PolicyOverrides>,
    label: &str,
) -> Result<EvaluationResult> {
    let policy = overrides.map_or_else(RoutingPolicy::new, RoutingPolicy::with_overrides);
    replay_with_policy(records, &policy, &AttentionModel::default(), label)
}

/// Route every record through its own freshly built router.
///
/// Each record gets a new collector holding exactly one sample built from its
/// telemetry, so no state carries over between records.
pub fn replay_with_policy(
    records: &[HistoricalRecord],
    policy: &RoutingPolicy,
    attention_model: &AttentionModel,
    label: &str,
) -> Result<EvaluationResult> {
    if records.is_empty() {
        return Err(ReplayError::EmptyRecords);
    }

    let mut strategy_counts: BTreeMap<RouteStrategy, usize> =
        RouteStrategy::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut priority_sum = 0.0;
    let mut attention_sum = 0.0;
    let mut router_human = 0usize;
    let mut baseline_human = 0usize;

    for record in records {
        let collector = Arc::new(TelemetryCollector::default());
        collector.record_sample(record.telemetry.to_sample(Utc::now()))?;

        let mut router = RouterService::new(collector, attention_model.clone(), policy.clone());
        router.update_operator_context(record.context.iter().map(|(k, v)| (k.clone(), *v)));
        let item = router.handle_task(&record.task)?;

        *strategy_counts.entry(item.route_strategy).or_insert(0) += 1;
        priority_sum += item.priority;
        attention_sum += item.attention_load;
        if item.route_strategy.requires_human() {
            router_human += 1;
        }
        if record.baseline_human {
            baseline_human += 1;
        }
    }

    let total = records.len() as f64;
    let baseline_human_rate = baseline_human as f64 / total;
    let router_human_rate = router_human as f64 / total;

    let result = EvaluationResult {
        policy_label: label.to_string(),
        total_tasks: records.len(),
        strategy_counts,
        average_priority: priority_sum / total,
        average_attention_load: attention_sum / total,
        baseline_human_rate,
        router_human_rate,
        human_reduction_pct: human_reduction_pct(baseline_human_rate, router_human_rate),
    };

    tracing::info!(
        label,
        total_tasks = result.total_tasks,
        router_human_rate,
        baseline_human_rate,
        "replay complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction_zero_baseline() {
        assert_eq!(human_reduction_pct(0.0, 0.5), 0.0);
    }

    #[test]
    fn test_reduction_can_go_negative() {
        assert!((human_reduction_pct(0.5, 0.25) - 50.0).abs() < 1e-9);
        assert!((human_reduction_pct(0.5, 0.75) + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_records_rejected() {
        let err = replay(&[], None, "default").unwrap_err();
        assert!(matches!(err, ReplayError::EmptyRecords));
    }
}
