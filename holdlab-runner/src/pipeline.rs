//! Validation pipeline: ingest, validate, hash, summarize.

use crate::reference::ReferenceData;
use holdlab_core::data::{read_holdings_csv_path, IngestError};
use holdlab_core::domain::HoldingsDataset;
use holdlab_core::{HoldingsValidator, ValidationIssue, ValidationOptions};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Report schema version. Reports with a newer version are rejected on load.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to ingest {path}: {source}")]
    Ingest {
        path: PathBuf,
        #[source]
        source: IngestError,
    },
}

/// Everything one validation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub schema_version: u32,
    /// File name or other label for the validated dataset.
    pub label: String,
    pub as_of: chrono::NaiveDate,
    pub row_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub messages: Vec<String>,
    pub imputed_prices: usize,
    /// Numeric cells that held non-numeric text and were read as null.
    pub coerced_cells: usize,
    /// BLAKE3 of the cleaned rows.
    pub dataset_hash: String,
    #[serde(skip)]
    pub cleaned: HoldingsDataset,
}

impl PipelineRun {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn schema_mismatch(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_schema_mismatch)
    }

    pub fn summary(&self, limit: usize) -> IssueSummary {
        IssueSummary::new(&self.messages, limit)
    }
}

/// Hash the cleaned dataset: headers, then every cell as rendered to CSV.
pub fn compute_dataset_hash(dataset: &HoldingsDataset) -> String {
    let mut hasher = blake3::Hasher::new();
    for column in &dataset.columns {
        hasher.update(column.as_bytes());
        hasher.update(b"\x1f");
    }
    for row in &dataset.rows {
        hasher.update(b"\x1e");
        for column in &dataset.columns {
            if let Some(cell) = row.render_header(column) {
                hasher.update(cell.as_bytes());
            }
            hasher.update(b"\x1f");
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Validate an in-memory dataset.
pub fn run_validation(
    label: &str,
    dataset: &HoldingsDataset,
    reference: &ReferenceData,
    options: &ValidationOptions,
) -> PipelineRun {
    let outcome = HoldingsValidator::new(&reference.currencies, &reference.regions)
        .with_options(*options)
        .validate(dataset);

    let messages = outcome.messages();
    if outcome.is_clean() {
        info!(label, rows = dataset.len(), "validation passed");
    } else {
        warn!(
            label,
            rows = dataset.len(),
            issues = outcome.issues.len(),
            "validation found issues"
        );
    }
    if outcome.imputed_prices > 0 {
        info!(label, imputed = outcome.imputed_prices, "imputed missing prices");
    }

    PipelineRun {
        schema_version: SCHEMA_VERSION,
        label: label.to_string(),
        as_of: options.today,
        row_count: outcome.cleaned.len(),
        issues: outcome.issues,
        messages,
        imputed_prices: outcome.imputed_prices,
        coerced_cells: 0,
        dataset_hash: compute_dataset_hash(&outcome.cleaned),
        cleaned: outcome.cleaned,
    }
}

/// Read and validate one CSV file.
pub fn validate_file(
    path: &Path,
    reference: &ReferenceData,
    options: &ValidationOptions,
) -> Result<PipelineRun, PipelineError> {
    let ingest = read_holdings_csv_path(path).map_err(|source| PipelineError::Ingest {
        path: path.to_path_buf(),
        source,
    })?;
    if !ingest.coerced.is_empty() {
        warn!(
            path = %path.display(),
            cells = ingest.coerced.len(),
            "non-numeric values read as null"
        );
    }

    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut run = run_validation(&label, &ingest.dataset, reference, options);
    run.coerced_cells = ingest.coerced.len();
    Ok(run)
}

/// Validate several files in parallel, sharing one copy of the reference data.
///
/// Results come back in input order.
pub fn validate_files(
    paths: &[PathBuf],
    reference: &ReferenceData,
    options: &ValidationOptions,
) -> Vec<(PathBuf, Result<PipelineRun, PipelineError>)> {
    info!(files = paths.len(), "validating holdings files");
    paths
        .par_iter()
        .map(|path| (path.clone(), validate_file(path, reference, options)))
        .collect()
}

/// The human-readable issue list printed after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub shown: Vec<String>,
    /// Issues beyond the display limit.
    pub hidden: usize,
}

impl IssueSummary {
    pub fn new(messages: &[String], limit: usize) -> Self {
        let shown: Vec<String> = messages.iter().take(limit).cloned().collect();
        Self {
            hidden: messages.len() - shown.len(),
            shown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty() && self.hidden == 0
    }
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("All validation checks passed!");
        }
        let mut lines: Vec<String> = self.shown.iter().map(|m| format!("- {m}")).collect();
        if self.hidden > 0 {
            lines.push(format!("... and {} more issues", self.hidden));
        }
        f.write_str(&lines.join("\n"))
    }
}
