//! Country → region lookup.

use super::loader::{ReferenceError, ReferenceTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Flat country-name → region-name mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryRegionMap(BTreeMap<String, String>);

impl CountryRegionMap {
    pub fn from_json_str(content: &str) -> Result<Self, ReferenceError> {
        serde_json::from_str(content).map_err(|source| ReferenceError::Parse {
            table: Self::TABLE,
            source,
        })
    }

    /// The built-in 14-country table.
    pub fn fallback() -> Self {
        [
            ("United States", "North America"),
            ("Canada", "North America"),
            ("Mexico", "North America"),
            ("United Kingdom", "Europe"),
            ("Germany", "Europe"),
            ("France", "Europe"),
            ("Japan", "Asia"),
            ("China", "Asia"),
            ("India", "Asia"),
            ("South Korea", "Asia"),
            ("Brazil", "South America"),
            ("Argentina", "South America"),
            ("Australia", "Oceania"),
            ("New Zealand", "Oceania"),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, country: impl Into<String>, region: impl Into<String>) {
        self.0.insert(country.into(), region.into());
    }

    pub fn region_for(&self, country: &str) -> Option<&str> {
        self.0.get(country).map(String::as_str)
    }

    pub fn is_country(&self, country: &str) -> bool {
        self.0.contains_key(country)
    }

    pub fn is_region(&self, region: &str) -> bool {
        self.0.values().any(|r| r == region)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn regions(&self) -> BTreeSet<&str> {
        self.0.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, R: Into<String>> FromIterator<(C, R)> for CountryRegionMap {
    fn from_iter<I: IntoIterator<Item = (C, R)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(c, r)| (c.into(), r.into()))
                .collect(),
        )
    }
}

impl ReferenceTable for CountryRegionMap {
    const TABLE: &'static str = "country-region map";

    fn parse_json(content: &str) -> Result<Self, ReferenceError> {
        Self::from_json_str(content)
    }

    fn fallback() -> Self {
        CountryRegionMap::fallback()
    }
}
