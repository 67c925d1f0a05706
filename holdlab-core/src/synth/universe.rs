//! Security universe used for synthetic holdings.
//!
//! Stored as TOML with one `[[securities]]` table per ticker. The built-in
//! universe only uses countries present in the fallback region map, so
//! data generated from it passes validation against the fallback tables.

use super::SynthError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static descriptive data for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityProfile {
    pub ticker: String,
    pub issue_name: String,
    pub sector: String,
    pub industry: String,
    pub country: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Trailing dividend yield, in percent.
    #[serde(default)]
    pub dividend_yield: f64,
}

fn default_currency() -> String {
    "USD".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityUniverse {
    pub securities: Vec<SecurityProfile>,
}

impl SecurityUniverse {
    pub fn from_file(path: &Path) -> Result<Self, SynthError> {
        let content = std::fs::read_to_string(path).map_err(|source| SynthError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SynthError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, SynthError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.securities.iter().map(|s| s.ticker.as_str()).collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&SecurityProfile> {
        self.securities.iter().find(|s| s.ticker == ticker)
    }

    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Large-cap US names plus a handful of foreign listings.
    pub fn default_universe() -> Self {
        let rows: [(&str, &str, &str, &str, &str, f64); 15] = [
            ("AAPL", "Apple Inc.", "Technology", "Consumer Electronics", "United States", 0.44),
            ("MSFT", "Microsoft Corporation", "Technology", "Software - Infrastructure", "United States", 0.72),
            ("GOOGL", "Alphabet Inc.", "Communication Services", "Internet Content & Information", "United States", 0.45),
            ("AMZN", "Amazon.com, Inc.", "Consumer Cyclical", "Internet Retail", "United States", 0.0),
            ("TSLA", "Tesla, Inc.", "Consumer Cyclical", "Auto Manufacturers", "United States", 0.0),
            ("META", "Meta Platforms, Inc.", "Communication Services", "Internet Content & Information", "United States", 0.35),
            ("NVDA", "NVIDIA Corporation", "Technology", "Semiconductors", "United States", 0.03),
            ("JPM", "JPMorgan Chase & Co.", "Financial Services", "Banks - Diversified", "United States", 2.1),
            ("V", "Visa Inc.", "Financial Services", "Credit Services", "United States", 0.7),
            ("JNJ", "Johnson & Johnson", "Healthcare", "Drug Manufacturers - General", "United States", 3.0),
            ("SHOP", "Shopify Inc.", "Technology", "Software - Application", "Canada", 0.0),
            ("BIDU", "Baidu, Inc.", "Communication Services", "Internet Content & Information", "China", 0.0),
            ("JD", "JD.com, Inc.", "Consumer Cyclical", "Internet Retail", "China", 2.5),
            ("MELI", "MercadoLibre, Inc.", "Consumer Cyclical", "Internet Retail", "Argentina", 0.0),
            ("TCEHY", "Tencent Holdings Limited", "Communication Services", "Internet Content & Information", "China", 0.8),
        ];

        let securities = rows
            .into_iter()
            .map(
                |(ticker, issue_name, sector, industry, country, dividend_yield)| SecurityProfile {
                    ticker: ticker.into(),
                    issue_name: issue_name.into(),
                    sector: sector.into(),
                    industry: industry.into(),
                    country: country.into(),
                    currency: default_currency(),
                    dividend_yield,
                },
            )
            .collect();

        Self { securities }
    }
}
