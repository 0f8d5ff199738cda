//! Core types for task routing

use crate::error::RouterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a routed task ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStrategy {
    /// Interrupt the operator now
    Immediate,
    /// Queue for scheduled review
    Batch,
    /// Resolve without human review
    Auto,
    /// Defer indefinitely
    Park,
}

impl RouteStrategy {
    pub const ALL: [RouteStrategy; 4] = [
        RouteStrategy::Immediate,
        RouteStrategy::Batch,
        RouteStrategy::Auto,
        RouteStrategy::Park,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStrategy::Immediate => "immediate",
            RouteStrategy::Batch => "batch",
            RouteStrategy::Auto => "auto",
            RouteStrategy::Park => "park",
        }
    }

    /// Immediate and batch both put the item in front of a human
    pub fn requires_human(&self) -> bool {
        matches!(self, RouteStrategy::Immediate | RouteStrategy::Batch)
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStrategy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(RouteStrategy::Immediate),
            "batch" => Ok(RouteStrategy::Batch),
            "auto" => Ok(RouteStrategy::Auto),
            "park" => Ok(RouteStrategy::Park),
            other => Err(RouterError::UnknownStrategy(other.to_string())),
        }
    }
}

fn default_sensitivity() -> String {
    "standard".to_string()
}

fn default_source() -> String {
    "agent".to_string()
}

/// A unit of agent-originated work awaiting a routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskIntent {
    pub task_id: String,
    /// 1 (routine) through 5 (critical)
    pub severity: u8,
    pub slo_risk_minutes: f64,
    /// Upstream model confidence in [0, 1]
    pub model_confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_sensitivity")]
    pub sensitivity_tag: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TaskIntent {
    pub fn new(
        task_id: impl Into<String>,
        severity: u8,
        slo_risk_minutes: f64,
        model_confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            severity,
            slo_risk_minutes,
            model_confidence,
            explanation: explanation.into(),
            sensitivity_tag: default_sensitivity(),
            source: default_source(),
            created_at: Utc::now(),
        }
    }

    pub fn with_sensitivity(mut self, tag: impl Into<String>) -> Self {
        self.sensitivity_tag = tag.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// The routing decision produced for one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub task_id: String,
    pub route_strategy: RouteStrategy,
    pub priority: f64,
    pub attention_load: f64,
    pub task: TaskIntent,
    pub rationale: String,
}
