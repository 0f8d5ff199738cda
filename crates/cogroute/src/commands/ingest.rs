use anyhow::Context;
use cogroute_replay::{convert_csv, load_mapping};
use cogroute_telemetry::write_json_pretty;
use std::path::Path;

pub fn run(csv: &Path, out: &Path, mapping: Option<&Path>) -> anyhow::Result<()> {
    let mapping = load_mapping(mapping)?;
    let records = convert_csv(csv, &mapping)
        .with_context(|| format!("failed to convert {}", csv.display()))?;

    write_json_pretty(out, &records)?;
    println!("Wrote {} records to {}", records.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogroute_replay::load_records;

    #[test]
    fn test_ingest_writes_loadable_records() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("export.csv");
        std::fs::write(
            &csv,
            "record_id,severity,slo_risk_minutes,model_confidence,baseline_human\n\
             a,2,10,0.9,yes\n\
             b,5,40,0.3,no\n",
        )
        .unwrap();
        let out = dir.path().join("nested").join("records.json");

        run(&csv, &out, None).unwrap();

        let records = load_records(&out).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].task.severity, 5);
        assert!(records[0].baseline_human);
    }
}
