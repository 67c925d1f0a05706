//! Reference data: currency limits and the country → region map.

pub mod currency;
pub mod loader;
pub mod region;

pub use currency::{
    CurrencyLimits, CurrencyLookupRow, CurrencyRule, CurrencyRules, FALLBACK_LIMITS,
};
pub use loader::{load_or_fallback, load_table, Loaded, ReferenceError, ReferenceTable};
pub use region::CountryRegionMap;
