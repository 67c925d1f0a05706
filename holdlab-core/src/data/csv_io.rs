//! Holdings CSV ingest and export.
//!
//! The header row becomes the dataset's column list verbatim, so a file
//! with missing or extra headers reaches the validator intact and the
//! column-set check can report it.

use crate::domain::{Column, HoldingsDataset, HoldingsRow};
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("duplicate header '{0}'")]
    DuplicateHeader(String),
}

/// A numeric cell whose text was not a number; it was read as null.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedCell {
    /// Zero-based data row (header excluded).
    pub row: usize,
    pub column: Column,
    pub raw: String,
}

/// Parsed dataset plus the cells that had to be coerced to null.
#[derive(Debug, Clone)]
pub struct CsvIngest {
    pub dataset: HoldingsDataset,
    pub coerced: Vec<CoercedCell>,
}

/// Read a holdings CSV from any reader.
pub fn read_holdings_csv<R: io::Read>(reader: R) -> Result<CsvIngest, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut seen = HashSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(IngestError::DuplicateHeader(h.clone()));
        }
    }
    let bindings: Vec<Option<Column>> = headers.iter().map(|h| Column::from_name(h)).collect();

    let mut rows = Vec::new();
    let mut coerced = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let mut row = HoldingsRow::default();
        for (j, value) in record.iter().enumerate() {
            match bindings.get(j).copied().flatten() {
                Some(column) => {
                    if let Err(bad) = row.set_text(column, value) {
                        coerced.push(CoercedCell {
                            row: i,
                            column: bad.column,
                            raw: bad.raw,
                        });
                    }
                }
                None => {
                    if !value.trim().is_empty() {
                        row.extra.insert(headers[j].clone(), value.to_string());
                    }
                }
            }
        }
        rows.push(row);
    }

    Ok(CsvIngest {
        dataset: HoldingsDataset::with_columns(headers, rows),
        coerced,
    })
}

/// Read a holdings CSV file.
pub fn read_holdings_csv_path(path: &Path) -> Result<CsvIngest, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_holdings_csv(io::BufReader::new(file))
}

/// Write a dataset as CSV using its own column order. Nulls are empty cells.
pub fn write_holdings_csv<W: io::Write>(
    dataset: &HoldingsDataset,
    writer: W,
) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        wtr.write_record(
            dataset
                .columns
                .iter()
                .map(|h| row.render_header(h).unwrap_or_default()),
        )?;
    }
    wtr.flush().map_err(|source| IngestError::Io {
        path: "<writer>".into(),
        source,
    })?;
    Ok(())
}

/// Write serde records as CSV, header taken from the field names.
///
/// An empty slice writes nothing, not even a header.
pub fn write_records_csv<T: Serialize, W: io::Write>(
    records: &[T],
    writer: W,
) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|source| IngestError::Io {
        path: "<writer>".into(),
        source,
    })?;
    Ok(())
}

/// Render a dataset as a CSV string.
pub fn holdings_to_csv_string(dataset: &HoldingsDataset) -> Result<String, IngestError> {
    let mut buf = Vec::new();
    write_holdings_csv(dataset, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
