//! Holdings column contract.
//!
//! The warehouse table and every CSV we ingest share these upper-case
//! column names. Order is irrelevant for validation; `Column::ALL` is the
//! order we write when no other order is known.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

/// One of the required holdings columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    Cusip,
    IsinCode,
    IssueName,
    Ticker,
    Price,
    Shares,
    MarketValue,
    CurrencyCode,
    HqCountry,
    IssueCountry,
    RegionName,
    PrimarySectorName,
    PrimarySubsectorName,
    PrimaryIndustryName,
    DividendYield,
    AssetClassName,
    BookValue,
    CostBasis,
    HistoryDate,
    PositionFlag,
    PortfolioCode,
}

impl Column {
    /// Every required column, in canonical write order.
    pub const ALL: [Column; 21] = [
        Column::Cusip,
        Column::IsinCode,
        Column::IssueName,
        Column::Ticker,
        Column::Price,
        Column::Shares,
        Column::MarketValue,
        Column::CurrencyCode,
        Column::HqCountry,
        Column::IssueCountry,
        Column::RegionName,
        Column::PrimarySectorName,
        Column::PrimarySubsectorName,
        Column::PrimaryIndustryName,
        Column::DividendYield,
        Column::AssetClassName,
        Column::BookValue,
        Column::CostBasis,
        Column::HistoryDate,
        Column::PositionFlag,
        Column::PortfolioCode,
    ];

    /// Columns that must never hold a null.
    pub const NON_NULL: [Column; 5] = [
        Column::Cusip,
        Column::IsinCode,
        Column::Ticker,
        Column::Shares,
        Column::PortfolioCode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Cusip => "CUSIP",
            Column::IsinCode => "ISINCODE",
            Column::IssueName => "ISSUENAME",
            Column::Ticker => "TICKER",
            Column::Price => "PRICE",
            Column::Shares => "SHARES",
            Column::MarketValue => "MARKETVALUE",
            Column::CurrencyCode => "CURRENCYCODE",
            Column::HqCountry => "HQCOUNTRY",
            Column::IssueCountry => "ISSUECOUNTRY",
            Column::RegionName => "REGIONNAME",
            Column::PrimarySectorName => "PRIMARYSECTORNAME",
            Column::PrimarySubsectorName => "PRIMARYSUBSECTORNAME",
            Column::PrimaryIndustryName => "PRIMARYINDUSTRYNAME",
            Column::DividendYield => "DIVIDENDYIELD",
            Column::AssetClassName => "ASSETCLASSNAME",
            Column::BookValue => "BOOKVALUE",
            Column::CostBasis => "COSTBASIS",
            Column::HistoryDate => "HISTORYDATE",
            Column::PositionFlag => "POSITION_FLAG",
            Column::PortfolioCode => "PORTFOLIOCODE",
        }
    }

    /// Look a column up by its exact header name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Price
            | Column::Shares
            | Column::MarketValue
            | Column::DividendYield
            | Column::BookValue
            | Column::CostBasis => ColumnKind::Number,
            _ => ColumnKind::Text,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scratch columns the validator may derive. They never survive into a
/// cleaned dataset, even when an input file happens to carry them.
pub const HELPER_COLUMNS: [&str; 2] = ["MV_DIFF", "RegionMatch"];

/// Canonical header list (all required columns, canonical order).
pub fn required_column_names() -> Vec<String> {
    Column::ALL.iter().map(|c| c.name().to_string()).collect()
}
