//! Per-currency price and cost-basis limits.

use super::loader::{ReferenceError, ReferenceTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price range and cost-basis ceiling applied to one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyLimits {
    pub price_min: f64,
    pub price_max: f64,
    pub costbasis_max: f64,
}

/// Limits used for currencies the rules do not know about.
pub const FALLBACK_LIMITS: CurrencyLimits = CurrencyLimits {
    price_min: 0.01,
    price_max: 10_000.0,
    costbasis_max: 1_000_000.0,
};

impl CurrencyLimits {
    pub fn price_in_range(&self, price: f64) -> bool {
        self.price_min <= price && price <= self.price_max
    }
}

/// One entry of the currency rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRule {
    pub price_min: f64,
    pub price_max: f64,
    pub costbasis_max: f64,
    /// Display name, e.g. "US Dollar". Only used by [`CurrencyLookupRow`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CurrencyRule {
    pub fn limits(&self) -> CurrencyLimits {
        CurrencyLimits {
            price_min: self.price_min,
            price_max: self.price_max,
            costbasis_max: self.costbasis_max,
        }
    }
}

/// One CURRENCYLOOKUP row: a rule flattened next to its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyLookupRow {
    #[serde(rename = "CURRENCYCODE")]
    pub currency_code: String,
    #[serde(rename = "CURRENCYNAME")]
    pub currency_name: Option<String>,
    #[serde(rename = "PRICEMIN")]
    pub price_min: f64,
    #[serde(rename = "PRICEMAX")]
    pub price_max: f64,
    #[serde(rename = "COSTBASISMAX")]
    pub costbasis_max: f64,
}

/// Currency code → rule, in the on-disk `{"valid_currencies": {...}}` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRules {
    pub valid_currencies: BTreeMap<String, CurrencyRule>,
}

impl CurrencyRules {
    pub fn from_json_str(content: &str) -> Result<Self, ReferenceError> {
        serde_json::from_str(content).map_err(|source| ReferenceError::Parse {
            table: Self::TABLE,
            source,
        })
    }

    /// The built-in table: USD, EUR and GBP with the fallback limits.
    pub fn fallback() -> Self {
        let valid_currencies = ["USD", "EUR", "GBP"]
            .into_iter()
            .map(|code| {
                (
                    code.to_string(),
                    CurrencyRule {
                        price_min: FALLBACK_LIMITS.price_min,
                        price_max: FALLBACK_LIMITS.price_max,
                        costbasis_max: FALLBACK_LIMITS.costbasis_max,
                        name: None,
                    },
                )
            })
            .collect();
        Self { valid_currencies }
    }

    pub fn insert(&mut self, code: impl Into<String>, rule: CurrencyRule) {
        self.valid_currencies.insert(code.into(), rule);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.valid_currencies.contains_key(code)
    }

    /// Limits for a row's currency; unknown or missing codes get [`FALLBACK_LIMITS`].
    pub fn limits_for(&self, code: Option<&str>) -> CurrencyLimits {
        code.and_then(|c| self.valid_currencies.get(c))
            .map(CurrencyRule::limits)
            .unwrap_or(FALLBACK_LIMITS)
    }

    /// The table as CURRENCYLOOKUP rows, ordered by code.
    pub fn lookup_rows(&self) -> Vec<CurrencyLookupRow> {
        self.valid_currencies
            .iter()
            .map(|(code, rule)| CurrencyLookupRow {
                currency_code: code.clone(),
                currency_name: rule.name.clone(),
                price_min: rule.price_min,
                price_max: rule.price_max,
                costbasis_max: rule.costbasis_max,
            })
            .collect()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.valid_currencies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.valid_currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_currencies.is_empty()
    }
}

impl ReferenceTable for CurrencyRules {
    const TABLE: &'static str = "currency rules";

    fn parse_json(content: &str) -> Result<Self, ReferenceError> {
        Self::from_json_str(content)
    }

    fn fallback() -> Self {
        CurrencyRules::fallback()
    }
}
