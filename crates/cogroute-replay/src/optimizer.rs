//! Policy grid sweeps and candidate ranking

use crate::error::{ReplayError, Result};
use crate::evaluator::{replay, EvaluationResult};
use crate::records::HistoricalRecord;
use cogroute_core::PolicyOverrides;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

/// One labeled policy in a grid file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridEntry {
    pub label: String,
    pub policy: PolicyOverrides,
}

/// Parse a grid: a JSON list of `{label?, policy}` objects.
///
/// Entries without a label (or with an empty one) are named `policy-N`,
/// counting from 1 by position in the list.
pub fn parse_grid(text: &str) -> Result<Vec<GridEntry>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ReplayError::Config(format!("grid is not valid JSON: {}", e)))?;
    let Value::Array(entries) = value else {
        return Err(ReplayError::Config("grid must be a JSON list".to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| parse_grid_entry(idx + 1, entry))
        .collect()
}

fn parse_grid_entry(position: usize, entry: Value) -> Result<GridEntry> {
    let Value::Object(mut fields) = entry else {
        return Err(ReplayError::Config(format!(
            "grid entry {} must be an object with a 'policy' object",
            position
        )));
    };

    let policy = match fields.remove("policy") {
        Some(policy @ Value::Object(_)) => serde_json::from_value(policy)
            .map_err(|e| ReplayError::Config(format!("grid entry {}: {}", position, e)))?,
        Some(_) => {
            return Err(ReplayError::Config(format!(
                "grid entry {}: 'policy' must be a JSON object",
                position
            )))
        }
        None => {
            return Err(ReplayError::Config(format!(
                "grid entry {} must include a 'policy' object",
                position
            )))
        }
    };

    let label = fields
        .get("label")
        .and_then(Value::as_str)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("policy-{}", position));

    Ok(GridEntry { label, policy })
}

pub fn load_grid(path: &Path) -> Result<Vec<GridEntry>> {
    let text = std::fs::read_to_string(path)?;
    parse_grid(&text)
}

/// What the optimizer minimizes. Every objective is oriented so that a lower
/// score is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Objective {
    /// Router human-intervention rate
    #[default]
    HumanRate,
    /// Negated reduction percentage
    HumanReduction,
    /// Negated mean priority
    Priority,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::HumanRate => "human_rate",
            Objective::HumanReduction => "human_reduction",
            Objective::Priority => "priority",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human_rate" => Ok(Objective::HumanRate),
            "human_reduction" => Ok(Objective::HumanReduction),
            "priority" => Ok(Objective::Priority),
            other => Err(ReplayError::Config(format!("unknown objective '{}'", other))),
        }
    }
}

pub fn compute_score(result: &EvaluationResult, objective: Objective) -> f64 {
    match objective {
        Objective::HumanRate => result.router_human_rate,
        Objective::HumanReduction => -result.human_reduction_pct,
        Objective::Priority => -result.average_priority,
    }
}

/// A grid entry that passed the constraints, with its 1-based rank.
///
/// Serializes flat: evaluation fields sit beside label, policy and score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub rank: usize,
    pub label: String,
    pub policy: PolicyOverrides,
    #[serde(flatten)]
    pub evaluation: EvaluationResult,
    pub score: f64,
}

/// Evaluate every grid entry and rank the survivors, best first.
///
/// Candidates are independent and run on scoped threads, at most one per
/// available core at a time. Any candidate whose
/// router human rate exceeds `max_router_rate` is dropped. Ties keep grid
/// order.
pub fn optimize(
    records: &[HistoricalRecord],
    grid: &[GridEntry],
    objective: Objective,
    max_router_rate: Option<f64>,
) -> Result<Vec<CandidateResult>> {
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let mut evaluations: Vec<Result<EvaluationResult>> = Vec::with_capacity(grid.len());
    for batch in grid.chunks(workers) {
        std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|entry| {
                    scope.spawn(move || replay(records, Some(&entry.policy), &entry.label))
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(result) => evaluations.push(result),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
        });
    }

    let mut candidates = Vec::with_capacity(grid.len());
    for (entry, evaluation) in grid.iter().zip(evaluations) {
        let evaluation = evaluation?;
        if let Some(ceiling) = max_router_rate {
            if evaluation.router_human_rate > ceiling {
                tracing::debug!(
                    label = %entry.label,
                    router_human_rate = evaluation.router_human_rate,
                    ceiling,
                    "candidate over router-rate ceiling"
                );
                continue;
            }
        }
        candidates.push(CandidateResult {
            rank: 0,
            label: entry.label.clone(),
            policy: entry.policy.clone(),
            score: compute_score(&evaluation, objective),
            evaluation,
        });
    }

    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    for (idx, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = idx + 1;
    }

    tracing::info!(
        evaluated = grid.len(),
        kept = candidates.len(),
        objective = %objective,
        "optimization complete"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogroute_core::RouteStrategy;
    use std::collections::BTreeMap;

    fn evaluation() -> EvaluationResult {
        EvaluationResult {
            policy_label: "default".to_string(),
            total_tasks: 2,
            strategy_counts: BTreeMap::from([
                (RouteStrategy::Immediate, 1),
                (RouteStrategy::Auto, 1),
            ]),
            average_priority: 0.5,
            average_attention_load: 0.4,
            baseline_human_rate: 0.6,
            router_human_rate: 0.5,
            human_reduction_pct: (0.6 - 0.5) / 0.6 * 100.0,
        }
    }

    #[test]
    fn test_grid_labels_default_by_position() {
        let grid = parse_grid(
            r#"[{"policy": {"slo_weight": 0.5}}, {"label": "custom", "policy": {}}, {"label": "", "policy": {}}]"#,
        )
        .unwrap();
        assert_eq!(grid[0].label, "policy-1");
        assert_eq!(grid[0].policy.slo_weight, Some(0.5));
        assert_eq!(grid[1].label, "custom");
        assert_eq!(grid[2].label, "policy-3");
    }

    #[test]
    fn test_grid_shape_errors() {
        for text in [
            r#"{"policy": {}}"#,
            r#"[1]"#,
            r#"[{"label": "x"}]"#,
            r#"[{"policy": [0.5]}]"#,
            r#"[{"policy": {"not_a_field": 1}}]"#,
        ] {
            let err = parse_grid(text).unwrap_err();
            assert!(matches!(err, ReplayError::Config(_)), "{} -> {:?}", text, err);
        }
    }

    #[test]
    fn test_score_orientation() {
        let result = evaluation();
        assert_eq!(compute_score(&result, Objective::HumanRate), 0.5);
        assert_eq!(
            compute_score(&result, Objective::HumanReduction),
            -result.human_reduction_pct
        );
        assert_eq!(compute_score(&result, Objective::Priority), -0.5);
    }

    #[test]
    fn test_objective_parse() {
        assert_eq!("human_reduction".parse::<Objective>().unwrap(), Objective::HumanReduction);
        assert!(matches!(
            "throughput".parse::<Objective>(),
            Err(ReplayError::Config(_))
        ));
    }

    #[test]
    fn test_grid_larger_than_core_count_keeps_order() {
        let records = crate::records::parse_records(
            r#"[{"task": {"task_id": "t1", "severity": 2, "slo_risk_minutes": 10, "model_confidence": 0.6}}]"#,
        )
        .unwrap();
        let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let grid: Vec<GridEntry> = (0..workers * 2 + 3)
            .map(|idx| GridEntry {
                label: format!("policy-{}", idx + 1),
                policy: PolicyOverrides::default(),
            })
            .collect();

        let ranked = optimize(&records, &grid, Objective::HumanRate, None).unwrap();
        assert_eq!(ranked.len(), grid.len());
        for (idx, candidate) in ranked.iter().enumerate() {
            assert_eq!(candidate.rank, idx + 1);
            assert_eq!(candidate.label, format!("policy-{}", idx + 1));
        }
    }

    #[test]
    fn test_empty_grid_yields_nothing() {
        let ranked = optimize(&[], &[], Objective::HumanRate, None).unwrap();
        assert!(ranked.is_empty());
    }
}
