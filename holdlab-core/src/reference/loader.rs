//! Reference-table loading with an explicit fallback outcome.
//!
//! Loaders never log and never panic. A file that cannot be read or parsed
//! yields [`Loaded::Fallback`] carrying the built-in table and the reason,
//! so the caller decides how loudly to complain.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a reference file could not be used.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("read {table} from {path}: {source}")]
    Read {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A lookup table that can be parsed from JSON and has a built-in default.
pub trait ReferenceTable: Sized {
    /// Human-readable table name used in errors.
    const TABLE: &'static str;

    fn parse_json(content: &str) -> Result<Self, ReferenceError>;

    fn fallback() -> Self;
}

/// Outcome of loading a reference table.
#[derive(Debug)]
pub enum Loaded<T> {
    FromFile { value: T, path: PathBuf },
    Fallback { value: T, reason: ReferenceError },
}

impl<T> Loaded<T> {
    pub fn value(&self) -> &T {
        match self {
            Loaded::FromFile { value, .. } | Loaded::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Loaded::FromFile { value, .. } | Loaded::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Loaded::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&ReferenceError> {
        match self {
            Loaded::Fallback { reason, .. } => Some(reason),
            Loaded::FromFile { .. } => None,
        }
    }
}

/// Read and parse a reference table, failing on any error.
pub fn load_table<T: ReferenceTable>(path: &Path) -> Result<T, ReferenceError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReferenceError::Read {
        table: T::TABLE,
        path: path.to_path_buf(),
        source,
    })?;
    T::parse_json(&content)
}

/// Read and parse a reference table, substituting the built-in table on failure.
pub fn load_or_fallback<T: ReferenceTable>(path: &Path) -> Loaded<T> {
    match load_table::<T>(path) {
        Ok(value) => Loaded::FromFile {
            value,
            path: path.to_path_buf(),
        },
        Err(reason) => Loaded::Fallback {
            value: T::fallback(),
            reason,
        },
    }
}
