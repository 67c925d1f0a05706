//! Synthetic data generation for demos and tests: holdings, plus the
//! performance and attribute tables that sit next to them.

pub mod attributes;
pub mod generator;
pub mod ids;
pub mod performance;
pub mod universe;

pub use attributes::{generate_attribute_rows, AttributeRow, ATTRIBUTE_OPTIONS};
pub use generator::{
    assign_portfolio_codes, generate_holdings, GenerateOptions, DEFAULT_PORTFOLIO, DEFAULT_REGION,
};
pub use ids::{derive_subsector, fake_cusip, fake_isin, random_history_date};
pub use performance::{generate_performance_rows, monthly_dates, PerformanceRow};
pub use universe::{SecurityProfile, SecurityUniverse};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("no portfolio codes to assign")]
    NoPortfolioCodes,

    #[error("failed to read universe file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid universe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize universe: {0}")]
    Serialize(#[from] toml::ser::Error),
}
