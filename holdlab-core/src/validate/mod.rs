//! Holdings validation and price imputation.
//!
//! The validator consumes a holdings dataset plus the two reference tables
//! and returns every issue it found together with a cleaned copy of the
//! data. Steps, in order:
//!
//! 1. Column-set check (missing columns stop here, input returned as-is)
//! 2. HISTORYDATE parsing (unparseable → null, never an error)
//! 3. Stable sort by (TICKER, HISTORYDATE)
//! 4. Per-ticker forward/backward fill of PRICE
//! 5. Row and column invariant checks
//! 6. Helper columns dropped from the output
//!
//! Data-quality problems never abort a run; they become issues.

pub mod checks;
pub mod dates;
pub mod impute;
pub mod issue;

pub use checks::{DIVIDEND_YIELD_RANGE, MARKET_VALUE_TOLERANCE};
pub use dates::parse_history_date;
pub use impute::forward_backward_fill;
pub use issue::{RegionPair, ValidationIssue};

use crate::domain::HoldingsDataset;
use crate::reference::{CountryRegionMap, CurrencyRules};
use chrono::NaiveDate;
use dates::CANONICAL_FORMAT;
use impute::{impute_prices, sort_by_ticker_and_date, StagedRow};
use serde::{Deserialize, Serialize};

/// Knobs that would otherwise be ambient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Reference date for the HISTORYDATE window.
    pub today: NaiveDate,
}

impl ValidationOptions {
    pub fn as_of(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// Result of one validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub issues: Vec<ValidationIssue>,
    pub cleaned: HoldingsDataset,
    /// Number of PRICE cells filled in by imputation.
    pub imputed_prices: usize,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Validation stopped at the column-set check.
    pub fn schema_mismatch(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_schema_mismatch)
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validator bound to one set of reference data.
///
/// Holds only shared references, so one validator can serve any number of
/// datasets, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct HoldingsValidator<'a> {
    currencies: &'a CurrencyRules,
    regions: &'a CountryRegionMap,
    options: ValidationOptions,
}

impl<'a> HoldingsValidator<'a> {
    pub fn new(currencies: &'a CurrencyRules, regions: &'a CountryRegionMap) -> Self {
        Self {
            currencies,
            regions,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn validate(&self, dataset: &HoldingsDataset) -> ValidationOutcome {
        let mut issues = Vec::new();

        let missing = dataset.missing_columns();
        let unexpected = dataset.unexpected_columns();
        let schema_mismatch = !missing.is_empty();
        if schema_mismatch {
            issues.push(ValidationIssue::MissingColumns { columns: missing });
        }
        if !unexpected.is_empty() {
            issues.push(ValidationIssue::UnexpectedColumns {
                columns: unexpected,
            });
        }
        if schema_mismatch {
            return ValidationOutcome {
                issues,
                cleaned: dataset.clone(),
                imputed_prices: 0,
            };
        }

        let mut staged: Vec<StagedRow> = dataset
            .rows
            .iter()
            .enumerate()
            .map(|(source_index, row)| StagedRow {
                source_index,
                date: row.history_date.as_deref().and_then(parse_history_date),
                row: row.clone(),
            })
            .collect();

        sort_by_ticker_and_date(&mut staged);
        let imputed_prices = impute_prices(&mut staged);

        checks::price_and_cost_basis(&staged, self.currencies, &mut issues);
        checks::valuation(&staged, &mut issues);
        checks::geography(&staged, self.regions, &mut issues);
        checks::categorical(&staged, self.currencies, &mut issues);
        checks::history_dates(&staged, self.options.today, &mut issues);
        checks::completeness(&staged, &mut issues);

        let rows = staged
            .into_iter()
            .map(|s| {
                let mut row = s.row;
                row.history_date = s.date.map(|d| d.format(CANONICAL_FORMAT).to_string());
                row
            })
            .collect();
        let mut cleaned = HoldingsDataset::with_columns(dataset.columns.clone(), rows);
        cleaned.drop_helper_columns();

        ValidationOutcome {
            issues,
            cleaned,
            imputed_prices,
        }
    }
}

/// Validate one dataset against the given reference data.
pub fn validate(
    dataset: &HoldingsDataset,
    currencies: &CurrencyRules,
    regions: &CountryRegionMap,
    options: &ValidationOptions,
) -> ValidationOutcome {
    HoldingsValidator::new(currencies, regions)
        .with_options(*options)
        .validate(dataset)
}
