use anyhow::Context;
use cogroute_replay::{load_grid, load_records, optimize, CandidateResult, Objective};
use cogroute_telemetry::write_json_pretty;
use std::path::Path;

pub fn run(
    data: &Path,
    grid: &Path,
    objective: Objective,
    max_router_rate: Option<f64>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let records = load_records(data)
        .with_context(|| format!("failed to load records from {}", data.display()))?;
    let grid = load_grid(grid)
        .with_context(|| format!("failed to load grid from {}", grid.display()))?;

    let ranked = optimize(&records, &grid, objective, max_router_rate)?;
    println!("{}", format_results(&ranked)?);

    if let Some(out) = out {
        if !ranked.is_empty() {
            write_json_pretty(out, &ranked)?;
        }
    }
    Ok(())
}

fn format_results(ranked: &[CandidateResult]) -> anyhow::Result<String> {
    let Some(best) = ranked.first() else {
        return Ok("No candidates met the constraints.".to_string());
    };

    let mut lines = vec![
        "Policy Optimization Results".to_string(),
        "Rank | Label | Score | Router rate | Baseline rate | Human reduction %".to_string(),
    ];
    for candidate in ranked {
        let evaluation = &candidate.evaluation;
        lines.push(format!(
            "{} | {} | {:.3} | {:.2} | {:.2} | {:.2}",
            candidate.rank,
            candidate.label,
            candidate.score,
            evaluation.router_human_rate,
            evaluation.baseline_human_rate,
            evaluation.human_reduction_pct
        ));
    }
    lines.push(String::new());
    lines.push("Recommended policy:".to_string());
    lines.push(serde_json::to_string_pretty(&best.policy)?);

    Ok(lines.join("\n"))
}
