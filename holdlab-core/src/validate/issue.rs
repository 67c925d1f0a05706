//! Validation issues.
//!
//! Each variant renders to the human-readable line the ingestion scripts
//! print and store in their reports. Per-row variants carry the row's
//! position in the input (before sorting) so the line points back at the
//! source file.

use crate::domain::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One (HQCOUNTRY, REGIONNAME) pair that disagrees with the region map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionPair {
    pub hq_country: Option<String>,
    pub region_name: Option<String>,
}

impl fmt::Display for RegionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"HQCOUNTRY\": {}, \"REGIONNAME\": {}}}",
            Quoted(self.hq_country.as_deref()),
            Quoted(self.region_name.as_deref())
        )
    }
}

/// A single data-quality or schema problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingColumns {
        columns: BTreeSet<String>,
    },
    UnexpectedColumns {
        columns: BTreeSet<String>,
    },
    PriceOutOfRange {
        row: usize,
        price: Option<f64>,
        currency: Option<String>,
        price_min: f64,
        price_max: f64,
    },
    NegativeCostBasis {
        row: usize,
        cost_basis: f64,
    },
    CostBasisAboveMax {
        row: usize,
        cost_basis: f64,
        currency: Option<String>,
        costbasis_max: f64,
    },
    NonPositiveShares,
    MarketValueMismatch,
    DividendYieldOutOfRange,
    NegativeBookValue,
    InvalidHqCountries {
        values: BTreeSet<String>,
    },
    InvalidIssueCountries {
        values: BTreeSet<String>,
    },
    InvalidRegions {
        values: BTreeSet<String>,
    },
    RegionMismatches {
        pairs: Vec<RegionPair>,
    },
    InvalidCurrencyCodes {
        values: Vec<Option<String>>,
    },
    InvalidPositionFlags {
        values: Vec<Option<String>>,
    },
    HistoryDateOutOfRange,
    NullValues {
        column: Column,
    },
    DuplicateTickerDates,
}

impl ValidationIssue {
    /// Structural problem that stopped validation before any row checks.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, ValidationIssue::MissingColumns { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValidationIssue::*;
        match self {
            MissingColumns { columns } => write!(f, "Missing columns: {columns:?}"),
            UnexpectedColumns { columns } => write!(f, "Unexpected columns: {columns:?}"),
            PriceOutOfRange {
                row,
                price,
                currency,
                price_min,
                price_max,
            } => write!(
                f,
                "Row {row}: PRICE {} out of range for {} [{price_min}-{price_max}]",
                Cell(*price),
                Bare(currency.as_ref())
            ),
            NegativeCostBasis { row, cost_basis } => {
                write!(f, "Row {row}: COSTBASIS {} is negative", Cell(Some(*cost_basis)))
            }
            CostBasisAboveMax {
                row,
                cost_basis,
                currency,
                costbasis_max,
            } => write!(
                f,
                "Row {row}: COSTBASIS {} exceeds max for {} [{costbasis_max}]",
                Cell(Some(*cost_basis)),
                Bare(currency.as_ref())
            ),
            NonPositiveShares => f.write_str("SHARES has zero or negative values"),
            MarketValueMismatch => {
                f.write_str("MARKETVALUE does not match PRICE * SHARES within tolerance")
            }
            DividendYieldOutOfRange => f.write_str("DIVIDENDYIELD out of 0–500% range"),
            NegativeBookValue => f.write_str("BOOKVALUE has negative values"),
            InvalidHqCountries { values } => write!(f, "Invalid HQCOUNTRY values: {values:?}"),
            InvalidIssueCountries { values } => {
                write!(f, "Invalid ISSUECOUNTRY values: {values:?}")
            }
            InvalidRegions { values } => write!(f, "Invalid REGIONNAME values: {values:?}"),
            RegionMismatches { pairs } => {
                f.write_str("HQCOUNTRY-region mismatches: [")?;
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{pair}")?;
                }
                f.write_str("]")
            }
            InvalidCurrencyCodes { values } => {
                write!(f, "Invalid CURRENCYCODE values: {}", ValueList(values))
            }
            InvalidPositionFlags { values } => {
                write!(f, "Invalid POSITION_FLAG values: {}", ValueList(values))
            }
            HistoryDateOutOfRange => f.write_str("Some HISTORYDATE values are out of expected range"),
            NullValues { column } => write!(f, "Null values found in {column}"),
            DuplicateTickerDates => f.write_str("Duplicate TICKER + HISTORYDATE rows found"),
        }
    }
}

/// `Some(v)` renders as `v`, `None` as `null`.
struct Bare<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for Bare<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("null"),
        }
    }
}

/// A numeric cell as the reports print it: always with a fractional part
/// (`20000.0`), `null` when missing.
struct Cell(Option<f64>);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:?}"),
            None => f.write_str("null"),
        }
    }
}

/// `Some(s)` renders as `"s"`, `None` as `null`.
struct Quoted<'a>(Option<&'a str>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(s) => write!(f, "{s:?}"),
            None => f.write_str("null"),
        }
    }
}

struct ValueList<'a>(&'a [Option<String>]);

impl fmt::Display for ValueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", Quoted(v.as_deref()))?;
        }
        f.write_str("]")
    }
}
