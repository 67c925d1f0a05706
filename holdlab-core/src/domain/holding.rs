//! A single holdings record: one security position on one date within one portfolio.

use super::column::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Long or short position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionFlag {
    Long,
    Short,
}

impl PositionFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            PositionFlag::Long => "LONG",
            PositionFlag::Short => "SHORT",
        }
    }

    /// Exact, case-sensitive parse. `"long"` is not a valid flag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LONG" => Some(PositionFlag::Long),
            "SHORT" => Some(PositionFlag::Short),
            _ => None,
        }
    }
}

impl fmt::Display for PositionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One holdings row.
///
/// Every field is nullable because the validator has to see and report
/// nulls rather than have them rejected at parse time. The position flag
/// and history date stay textual for the same reason: invalid flags and
/// unparseable dates are data-quality issues, not ingest errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsRow {
    pub cusip: Option<String>,
    pub isin_code: Option<String>,
    pub issue_name: Option<String>,
    pub ticker: Option<String>,
    pub price: Option<f64>,
    pub shares: Option<f64>,
    pub market_value: Option<f64>,
    pub currency_code: Option<String>,
    pub hq_country: Option<String>,
    pub issue_country: Option<String>,
    pub region_name: Option<String>,
    pub primary_sector_name: Option<String>,
    pub primary_subsector_name: Option<String>,
    pub primary_industry_name: Option<String>,
    pub dividend_yield: Option<f64>,
    pub asset_class_name: Option<String>,
    pub book_value: Option<f64>,
    pub cost_basis: Option<f64>,
    pub history_date: Option<String>,
    pub position_flag: Option<String>,
    pub portfolio_code: Option<String>,
    /// Values of columns outside the required set, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Borrowed view of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

impl FieldRef<'_> {
    pub fn is_null(&self) -> bool {
        match self {
            FieldRef::Text(v) => v.is_none(),
            FieldRef::Number(v) => v.is_none(),
        }
    }

    /// Render the cell the way it is written to CSV. Nulls render as `None`.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldRef::Text(v) => v.map(str::to_string),
            FieldRef::Number(v) => v.map(|n| n.to_string()),
        }
    }
}

enum FieldMut<'a> {
    Text(&'a mut Option<String>),
    Number(&'a mut Option<f64>),
}

/// A numeric column held text that is not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct NotANumber {
    pub column: Column,
    pub raw: String,
}

impl HoldingsRow {
    pub fn field(&self, column: Column) -> FieldRef<'_> {
        match column {
            Column::Cusip => FieldRef::Text(self.cusip.as_deref()),
            Column::IsinCode => FieldRef::Text(self.isin_code.as_deref()),
            Column::IssueName => FieldRef::Text(self.issue_name.as_deref()),
            Column::Ticker => FieldRef::Text(self.ticker.as_deref()),
            Column::Price => FieldRef::Number(self.price),
            Column::Shares => FieldRef::Number(self.shares),
            Column::MarketValue => FieldRef::Number(self.market_value),
            Column::CurrencyCode => FieldRef::Text(self.currency_code.as_deref()),
            Column::HqCountry => FieldRef::Text(self.hq_country.as_deref()),
            Column::IssueCountry => FieldRef::Text(self.issue_country.as_deref()),
            Column::RegionName => FieldRef::Text(self.region_name.as_deref()),
            Column::PrimarySectorName => FieldRef::Text(self.primary_sector_name.as_deref()),
            Column::PrimarySubsectorName => FieldRef::Text(self.primary_subsector_name.as_deref()),
            Column::PrimaryIndustryName => FieldRef::Text(self.primary_industry_name.as_deref()),
            Column::DividendYield => FieldRef::Number(self.dividend_yield),
            Column::AssetClassName => FieldRef::Text(self.asset_class_name.as_deref()),
            Column::BookValue => FieldRef::Number(self.book_value),
            Column::CostBasis => FieldRef::Number(self.cost_basis),
            Column::HistoryDate => FieldRef::Text(self.history_date.as_deref()),
            Column::PositionFlag => FieldRef::Text(self.position_flag.as_deref()),
            Column::PortfolioCode => FieldRef::Text(self.portfolio_code.as_deref()),
        }
    }

    fn field_mut(&mut self, column: Column) -> FieldMut<'_> {
        match column {
            Column::Cusip => FieldMut::Text(&mut self.cusip),
            Column::IsinCode => FieldMut::Text(&mut self.isin_code),
            Column::IssueName => FieldMut::Text(&mut self.issue_name),
            Column::Ticker => FieldMut::Text(&mut self.ticker),
            Column::Price => FieldMut::Number(&mut self.price),
            Column::Shares => FieldMut::Number(&mut self.shares),
            Column::MarketValue => FieldMut::Number(&mut self.market_value),
            Column::CurrencyCode => FieldMut::Text(&mut self.currency_code),
            Column::HqCountry => FieldMut::Text(&mut self.hq_country),
            Column::IssueCountry => FieldMut::Text(&mut self.issue_country),
            Column::RegionName => FieldMut::Text(&mut self.region_name),
            Column::PrimarySectorName => FieldMut::Text(&mut self.primary_sector_name),
            Column::PrimarySubsectorName => FieldMut::Text(&mut self.primary_subsector_name),
            Column::PrimaryIndustryName => FieldMut::Text(&mut self.primary_industry_name),
            Column::DividendYield => FieldMut::Number(&mut self.dividend_yield),
            Column::AssetClassName => FieldMut::Text(&mut self.asset_class_name),
            Column::BookValue => FieldMut::Number(&mut self.book_value),
            Column::CostBasis => FieldMut::Number(&mut self.cost_basis),
            Column::HistoryDate => FieldMut::Text(&mut self.history_date),
            Column::PositionFlag => FieldMut::Text(&mut self.position_flag),
            Column::PortfolioCode => FieldMut::Text(&mut self.portfolio_code),
        }
    }

    /// Set a cell from its textual form.
    ///
    /// Empty (or all-whitespace) text is a null. Numeric columns that do not
    /// parse are set to null and reported back so the caller can count them.
    pub fn set_text(&mut self, column: Column, raw: &str) -> Result<(), NotANumber> {
        let trimmed = raw.trim();
        match self.field_mut(column) {
            FieldMut::Text(slot) => {
                *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
                Ok(())
            }
            FieldMut::Number(slot) => {
                if trimmed.is_empty() {
                    *slot = None;
                    return Ok(());
                }
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => {
                        *slot = Some(v);
                        Ok(())
                    }
                    _ => {
                        *slot = None;
                        Err(NotANumber {
                            column,
                            raw: raw.to_string(),
                        })
                    }
                }
            }
        }
    }

    /// Render the cell for an arbitrary header: required columns come from
    /// the typed fields, anything else from `extra`.
    pub fn render_header(&self, header: &str) -> Option<String> {
        match Column::from_name(header) {
            Some(column) => self.field(column).render(),
            None => self.extra.get(header).cloned(),
        }
    }
}
