use anyhow::Context;
use cogroute_core::RouteStrategy;
use cogroute_replay::{load_grid, load_policy_overrides, load_records, replay, EvaluationResult};
use cogroute_telemetry::write_json_pretty;
use std::path::Path;

pub fn run(
    data: &Path,
    policy: Option<&str>,
    grid: Option<&Path>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let records = load_records(data)
        .with_context(|| format!("failed to load records from {}", data.display()))?;

    if let Some(grid_path) = grid {
        let grid = load_grid(grid_path)
            .with_context(|| format!("failed to load grid from {}", grid_path.display()))?;
        let results = grid
            .iter()
            .map(|entry| replay(&records, Some(&entry.policy), &entry.label))
            .collect::<Result<Vec<_>, _>>()?;

        println!("{}", format_sweep(&results));
        if let Some(out) = out {
            write_json_pretty(out, &results)?;
        }
    } else {
        let overrides = policy.map(load_policy_overrides).transpose()?;
        let result = replay(&records, overrides.as_ref(), "default")?;

        println!("{}", format_summary(&result));
        if let Some(out) = out {
            write_json_pretty(out, &result)?;
        }
    }

    Ok(())
}

fn format_counts(result: &EvaluationResult) -> String {
    RouteStrategy::ALL
        .iter()
        .map(|s| format!("{}={}", s, result.count(*s)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_summary(result: &EvaluationResult) -> String {
    format!(
        "Offline Evaluation Summary (policy: {})\n\
         Total tasks: {}\n\
         Strategy counts: {}\n\
         Average priority: {:.2}\n\
         Average attention load: {:.2}\n\
         Baseline human rate: {:.2} | Router human rate: {:.2}\n\
         Human intervention reduction: {:.2}%",
        result.policy_label,
        result.total_tasks,
        format_counts(result),
        result.average_priority,
        result.average_attention_load,
        result.baseline_human_rate,
        result.router_human_rate,
        result.human_reduction_pct
    )
}

fn format_sweep(results: &[EvaluationResult]) -> String {
    let mut lines = vec![
        "Offline Evaluation Sweep".to_string(),
        "Label | Router rate | Baseline rate | Human reduction %".to_string(),
    ];
    for result in results {
        lines.push(format!(
            "{} | {:.2} | {:.2} | {:.2}",
            result.policy_label,
            result.router_human_rate,
            result.baseline_human_rate,
            result.human_reduction_pct
        ));
    }
    lines.join("\n")
}
