//! Destinations for validated holdings.
//!
//! The pipeline hands cleaned rows to a [`HoldingsSink`]. Implementations
//! here write to a CSV file or keep the rows in memory; a database loader
//! would be one more implementation of the same trait.

use crate::pipeline::PipelineRun;
use holdlab_core::domain::{HoldingsDataset, HoldingsRow};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("refusing to upload an empty dataset")]
    EmptyDataset,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{sink}: columns {got:?} do not match existing {expected:?}")]
    ColumnMismatch {
        sink: String,
        expected: Vec<String>,
        got: Vec<String>,
    },
}

/// Something that accepts batches of holdings rows.
pub trait HoldingsSink: Send {
    fn name(&self) -> &str;

    /// Store `rows`, laid out by `columns`. Returns the number of rows written.
    fn insert(&mut self, columns: &[String], rows: &[HoldingsRow]) -> Result<usize, SinkError>;
}

/// Appends rows to a CSV file, writing the header when the file is new.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
    name: String,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn existing_header(&self) -> Result<Option<Vec<String>>, SinkError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let mut rdr = csv::Reader::from_reader(file);
        let headers = rdr.headers()?;
        if headers.is_empty() {
            return Ok(None);
        }
        Ok(Some(headers.iter().map(str::to_string).collect()))
    }
}

impl HoldingsSink for CsvFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&mut self, columns: &[String], rows: &[HoldingsRow]) -> Result<usize, SinkError> {
        let header = self.existing_header()?;
        if let Some(existing) = &header {
            if existing.as_slice() != columns {
                return Err(SinkError::ColumnMismatch {
                    sink: self.name.clone(),
                    expected: existing.clone(),
                    got: columns.to_vec(),
                });
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if header.is_none() {
            wtr.write_record(columns)?;
        }
        for row in rows {
            wtr.write_record(columns.iter().map(|c| row.render_header(c).unwrap_or_default()))?;
        }
        wtr.flush().map_err(|e| self.io_error(e))?;
        Ok(rows.len())
    }
}

/// Keeps every inserted batch in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub batches: Vec<HoldingsDataset>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.batches.iter().map(HoldingsDataset::len).sum()
    }
}

impl HoldingsSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn insert(&mut self, columns: &[String], rows: &[HoldingsRow]) -> Result<usize, SinkError> {
        self.batches
            .push(HoldingsDataset::with_columns(columns.to_vec(), rows.to_vec()));
        Ok(rows.len())
    }
}

/// Hand a run's cleaned rows to `sink`.
///
/// Outstanding issues are logged but do not block the upload; an empty
/// dataset does.
pub fn upload(run: &PipelineRun, sink: &mut dyn HoldingsSink) -> Result<usize, SinkError> {
    if run.cleaned.is_empty() {
        return Err(SinkError::EmptyDataset);
    }
    if !run.is_clean() {
        warn!(
            label = %run.label,
            issues = run.issues.len(),
            sink = sink.name(),
            "uploading dataset with unresolved issues"
        );
    }
    let written = sink.insert(&run.cleaned.columns, &run.cleaned.rows)?;
    info!(label = %run.label, sink = sink.name(), rows = written, "uploaded holdings");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdlab_core::data::read_holdings_csv_path;

    fn row(ticker: &str, price: f64) -> HoldingsRow {
        HoldingsRow {
            ticker: Some(ticker.into()),
            price: Some(price),
            ..Default::default()
        }
    }

    fn columns() -> Vec<String> {
        vec!["TICKER".into(), "PRICE".into()]
    }

    #[test]
    fn csv_sink_appends_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.csv");
        let mut sink = CsvFileSink::new(&path);

        assert_eq!(sink.insert(&columns(), &[row("AAPL", 190.0)]).unwrap(), 1);
        assert_eq!(
            sink.insert(&columns(), &[row("MSFT", 410.5), row("JPM", 200.0)])
                .unwrap(),
            2
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "TICKER,PRICE\nAAPL,190\nMSFT,410.5\nJPM,200\n");
        let reread = read_holdings_csv_path(&path).unwrap().dataset;
        assert_eq!(reread.len(), 3);
    }

    #[test]
    fn csv_sink_rejects_different_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.csv");
        let mut sink = CsvFileSink::new(&path);
        sink.insert(&columns(), &[row("AAPL", 190.0)]).unwrap();

        let err = sink
            .insert(&["PRICE".to_string(), "TICKER".to_string()], &[row("MSFT", 1.0)])
            .unwrap_err();
        assert!(matches!(err, SinkError::ColumnMismatch { .. }));
    }

    #[test]
    fn memory_sink_keeps_batches() {
        let mut sink = MemorySink::new();
        sink.insert(&columns(), &[row("AAPL", 190.0)]).unwrap();
        sink.insert(&columns(), &[row("MSFT", 410.0), row("JPM", 200.0)])
            .unwrap();
        assert_eq!(sink.batches.len(), 2);
        assert_eq!(sink.row_count(), 3);
        assert_eq!(sink.name(), "memory");
    }
}
