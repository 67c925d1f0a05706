//! Reference table loading with fallbacks.
//!
//! A missing or malformed table never stops a run: the built-in table is
//! used instead and the reason is logged and kept in [`ReferenceSource`].

use crate::config::ReferenceConfig;
use holdlab_core::reference::{load_or_fallback, CountryRegionMap, CurrencyRules, Loaded};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Where one reference table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReferenceSource {
    File { path: PathBuf },
    Fallback { reason: String },
}

impl ReferenceSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ReferenceSource::Fallback { .. })
    }
}

impl std::fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceSource::File { path } => write!(f, "{}", path.display()),
            ReferenceSource::Fallback { reason } => write!(f, "built-in fallback ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSources {
    pub currencies: ReferenceSource,
    pub country_regions: ReferenceSource,
}

/// Both reference tables, ready to share across validation threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub currencies: CurrencyRules,
    pub regions: CountryRegionMap,
    pub sources: ReferenceSources,
}

impl ReferenceData {
    /// Built-in tables only, no files consulted.
    pub fn fallback() -> Self {
        let builtin = || ReferenceSource::Fallback {
            reason: "not configured".into(),
        };
        Self {
            currencies: CurrencyRules::fallback(),
            regions: CountryRegionMap::fallback(),
            sources: ReferenceSources {
                currencies: builtin(),
                country_regions: builtin(),
            },
        }
    }

    pub fn any_fallback(&self) -> bool {
        self.sources.currencies.is_fallback() || self.sources.country_regions.is_fallback()
    }
}

fn resolve<T>(table: &str, loaded: Loaded<T>) -> (T, ReferenceSource) {
    match loaded {
        Loaded::FromFile { value, path } => {
            info!(table, path = %path.display(), "loaded reference table");
            (value, ReferenceSource::File { path })
        }
        Loaded::Fallback { value, reason } => {
            warn!(table, %reason, "using built-in reference table");
            (
                value,
                ReferenceSource::Fallback {
                    reason: reason.to_string(),
                },
            )
        }
    }
}

/// Load the currency rules and region map named in `config`.
pub fn load_reference_data(config: &ReferenceConfig) -> ReferenceData {
    let (currencies, currency_source) = resolve(
        "currencies",
        load_or_fallback::<CurrencyRules>(&config.currencies),
    );
    let (regions, region_source) = resolve(
        "country_regions",
        load_or_fallback::<CountryRegionMap>(&config.country_regions),
    );

    ReferenceData {
        currencies,
        regions,
        sources: ReferenceSources {
            currencies: currency_source,
            country_regions: region_source,
        },
    }
}
