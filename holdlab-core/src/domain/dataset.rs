//! Column-aware holdings dataset.

use super::column::{required_column_names, Column, HELPER_COLUMNS};
use super::holding::HoldingsRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Rows plus the header list they were read with.
///
/// The header list is tracked separately from the rows because the
/// column-set check is a property of the dataset, not of any one row: a
/// CSV without a `PORTFOLIOCODE` header is structurally different from a
/// CSV whose `PORTFOLIOCODE` cells are all empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsDataset {
    pub columns: Vec<String>,
    pub rows: Vec<HoldingsRow>,
}

impl HoldingsDataset {
    /// Dataset with the canonical required header list.
    pub fn new(rows: Vec<HoldingsRow>) -> Self {
        Self {
            columns: required_column_names(),
            rows,
        }
    }

    pub fn with_columns(columns: Vec<String>, rows: Vec<HoldingsRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Required columns absent from the header list.
    pub fn missing_columns(&self) -> BTreeSet<String> {
        Column::ALL
            .iter()
            .map(|c| c.name())
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect()
    }

    /// Headers that are not required columns.
    pub fn unexpected_columns(&self) -> BTreeSet<String> {
        self.columns
            .iter()
            .filter(|name| Column::from_name(name).is_none())
            .cloned()
            .collect()
    }

    /// Remove a header (and its extra values) from the dataset.
    pub fn drop_column(&mut self, name: &str) {
        self.columns.retain(|c| c != name);
        for row in &mut self.rows {
            row.extra.remove(name);
        }
    }

    /// Strip the validator's scratch columns.
    pub fn drop_helper_columns(&mut self) {
        for helper in HELPER_COLUMNS {
            self.drop_column(helper);
        }
    }
}
