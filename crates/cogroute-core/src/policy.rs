//! Priority scoring and the route decision table

use crate::attention::clamp_unit;
use crate::types::{RouteStrategy, TaskIntent};
use serde::{Deserialize, Serialize};

const MAX_SEVERITY: f64 = 5.0;

/// Weights, norms and thresholds for turning a task into a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub slo_weight: f64,
    pub uncertainty_weight: f64,
    pub severity_weight: f64,
    pub attention_weight: f64,
    /// SLO risk (minutes) that saturates the SLO component
    pub slo_risk_norm: f64,
    pub immediate_threshold: f64,
    pub batch_threshold: f64,
    pub min_confidence_for_auto: f64,
}

/// Any subset of [`RoutingPolicy`] fields; unknown keys are rejected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slo_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slo_risk_norm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence_for_auto: Option<f64>,
}

impl RoutingPolicy {
    pub fn new() -> Self {
        Self {
            slo_weight: 0.4,
            uncertainty_weight: 0.25,
            severity_weight: 0.25,
            attention_weight: 0.1,
            slo_risk_norm: 30.0,
            immediate_threshold: 0.75,
            batch_threshold: 0.45,
            min_confidence_for_auto: 0.85,
        }
    }

    /// Defaults with every present override applied
    pub fn with_overrides(overrides: &PolicyOverrides) -> Self {
        let mut policy = Self::new();
        policy.apply(overrides);
        policy
    }

    pub fn apply(&mut self, overrides: &PolicyOverrides) {
        let fields = [
            (&mut self.slo_weight, overrides.slo_weight),
            (&mut self.uncertainty_weight, overrides.uncertainty_weight),
            (&mut self.severity_weight, overrides.severity_weight),
            (&mut self.attention_weight, overrides.attention_weight),
            (&mut self.slo_risk_norm, overrides.slo_risk_norm),
            (&mut self.immediate_threshold, overrides.immediate_threshold),
            (&mut self.batch_threshold, overrides.batch_threshold),
            (
                &mut self.min_confidence_for_auto,
                overrides.min_confidence_for_auto,
            ),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    pub fn compute_priority(&self, task: &TaskIntent, attention_load: f64) -> f64 {
        let slo = if self.slo_risk_norm > 0.0 {
            clamp_unit(task.slo_risk_minutes / self.slo_risk_norm)
        } else {
            0.0
        };
        let uncertainty = clamp_unit(1.0 - task.model_confidence);
        let severity = clamp_unit(task.severity as f64 / MAX_SEVERITY);
        let attention = clamp_unit(attention_load);

        clamp_unit(
            slo * self.slo_weight
                + uncertainty * self.uncertainty_weight
                + severity * self.severity_weight
                + attention * self.attention_weight,
        )
    }

    /// Ordered decision table; the first matching row wins.
    ///
    /// Severity 5 forces `Immediate` whatever the priority, and the `Auto` row
    /// looks only at confidence and severity.
    pub fn route_strategy(&self, task: &TaskIntent, priority: f64) -> RouteStrategy {
        if task.severity >= 5 || priority >= self.immediate_threshold {
            RouteStrategy::Immediate
        } else if priority >= self.batch_threshold {
            RouteStrategy::Batch
        } else if task.model_confidence >= self.min_confidence_for_auto && task.severity <= 2 {
            RouteStrategy::Auto
        } else {
            RouteStrategy::Park
        }
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::new()
    }
}
