//! Run artifacts: JSON report plus the cleaned CSV.
//!
//! The report carries a `schema_version`; unknown versions are rejected on load.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use holdlab_core::data::{holdings_to_csv_string, read_holdings_csv};

use crate::pipeline::{PipelineRun, SCHEMA_VERSION};

pub const REPORT_FILE: &str = "report.json";
pub const CLEANED_FILE: &str = "cleaned.csv";

/// Serialize a run report (without the cleaned rows) to pretty JSON.
pub fn export_report_json(run: &PipelineRun) -> Result<String> {
    serde_json::to_string_pretty(run).context("failed to serialize PipelineRun to JSON")
}

/// Deserialize a run report, rejecting unknown schema versions.
pub fn import_report_json(json: &str) -> Result<PipelineRun> {
    let run: PipelineRun =
        serde_json::from_str(json).context("failed to deserialize PipelineRun from JSON")?;
    if run.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            run.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(run)
}

/// Create a fresh `{base}` directory under `output_dir`, falling back to
/// `{base}_1`, `{base}_2`, ... when the name is taken.
fn create_run_dir(output_dir: &Path, base: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut attempt = 0usize;
    loop {
        let name = match attempt {
            0 => base.to_string(),
            n => format!("{base}_{n}"),
        };
        let run_dir = output_dir.join(name);
        match std::fs::create_dir(&run_dir) {
            Ok(()) => return Ok(run_dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to create artifact dir: {}", run_dir.display())
                })
            }
        }
    }
}

/// Save the artifact set for one run.
///
/// Creates `{label}_{timestamp}/` under `output_dir` containing:
/// - `report.json`: issues, counts and dataset hash
/// - `cleaned.csv`: the validated, imputed, sorted rows
///
/// An existing directory is never reused; a numeric suffix keeps runs with
/// the same label apart. Returns the path to the created directory.
pub fn save_artifacts(run: &PipelineRun, output_dir: &Path) -> Result<PathBuf> {
    let base = format!(
        "{}_{}",
        run.label,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = create_run_dir(output_dir, &base)?;

    let json = export_report_json(run)?;
    std::fs::write(run_dir.join(REPORT_FILE), &json)?;

    let csv = holdings_to_csv_string(&run.cleaned)?;
    std::fs::write(run_dir.join(CLEANED_FILE), &csv)?;

    Ok(run_dir)
}

/// Load a run from an artifact directory, cleaned rows included.
pub fn load_artifacts(dir: &Path) -> Result<PipelineRun> {
    let report_path = dir.join(REPORT_FILE);
    let json = std::fs::read_to_string(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    let mut run = import_report_json(&json)?;

    let csv_path = dir.join(CLEANED_FILE);
    let file = std::fs::File::open(&csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    run.cleaned = read_holdings_csv(file)?.dataset;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;
    use chrono::NaiveDate;
    use holdlab_core::domain::HoldingsDataset;
    use holdlab_core::synth::{generate_holdings, GenerateOptions, SecurityUniverse};
    use holdlab_core::ValidationOptions;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_run() -> PipelineRun {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut rows = generate_holdings(
            &SecurityUniverse::default_universe(),
            &Default::default(),
            &holdlab_core::reference::CountryRegionMap::fallback(),
            &GenerateOptions::new(10, today),
            &mut rng,
        );
        rows[0].shares = Some(-1.0);
        crate::pipeline::run_validation(
            "sample",
            &HoldingsDataset::new(rows),
            &ReferenceData::fallback(),
            &ValidationOptions::as_of(today),
        )
    }

    #[test]
    fn artifacts_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let run = sample_run();
        let run_dir = save_artifacts(&run, dir.path()).unwrap();

        assert!(run_dir.join(REPORT_FILE).exists());
        assert!(run_dir.join(CLEANED_FILE).exists());
        assert!(run_dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("sample_"));

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded, run);
    }

    #[test]
    fn same_label_runs_get_separate_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = sample_run();
        first.label = "holdings".into();
        first.row_count = 111;
        let mut second = first.clone();
        second.row_count = 222;

        let first_dir = save_artifacts(&first, dir.path()).unwrap();
        let second_dir = save_artifacts(&second, dir.path()).unwrap();
        assert_ne!(first_dir, second_dir);

        assert_eq!(load_artifacts(&first_dir).unwrap().row_count, 111);
        assert_eq!(load_artifacts(&second_dir).unwrap().row_count, 222);
    }

    #[test]
    fn taken_names_get_numeric_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let a = create_run_dir(dir.path(), "holdings_20250630_120000").unwrap();
        let b = create_run_dir(dir.path(), "holdings_20250630_120000").unwrap();
        let c = create_run_dir(dir.path(), "holdings_20250630_120000").unwrap();
        assert_eq!(a.file_name().unwrap(), "holdings_20250630_120000");
        assert_eq!(b.file_name().unwrap(), "holdings_20250630_120000_1");
        assert_eq!(c.file_name().unwrap(), "holdings_20250630_120000_2");
    }

    #[test]
    fn report_json_omits_rows() {
        let run = sample_run();
        let json = export_report_json(&run).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("cleaned").is_none());
        assert_eq!(value["row_count"], 10);
        assert_eq!(value["issues"][0]["kind"], "non_positive_shares");
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut run = sample_run();
        run.schema_version = SCHEMA_VERSION + 1;
        let json = export_report_json(&run).unwrap();
        let err = import_report_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }
}
