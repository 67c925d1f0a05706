//! Pipeline configuration loaded from TOML.
//!
//! Every section is optional; a missing key takes the default shown here:
//!
//! ```toml
//! [reference]
//! currencies = "app/valid_currencies.json"
//! country_regions = "app/country_region_map.json"
//!
//! [validation]
//! max_displayed_issues = 10
//!
//! [output]
//! dir = "results"
//!
//! [synthetic]
//! seed = 42
//! max_count = 2000
//! observations_per_ticker = 1
//! portfolio_codes = ["PORT001"]
//! performance_start = "2010-01-01"
//! performance_end = "2025-07-31"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference: ReferenceConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    pub synthetic: SyntheticConfig,
}

/// Locations of the two reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub currencies: PathBuf,
    pub country_regions: PathBuf,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            currencies: PathBuf::from("app/valid_currencies.json"),
            country_regions: PathBuf::from("app/country_region_map.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Issues printed before the summary collapses to "... and N more".
    pub max_displayed_issues: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_displayed_issues: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub max_count: usize,
    pub observations_per_ticker: usize,
    pub portfolio_codes: Vec<String>,
    /// TOML security universe; the built-in universe when unset.
    pub universe: Option<PathBuf>,
    /// First month of the synthetic performance series.
    pub performance_start: NaiveDate,
    /// Last day a performance month may fall on.
    pub performance_end: NaiveDate,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_count: 2000,
            observations_per_ticker: 1,
            portfolio_codes: vec!["PORT001".into()],
            universe: None,
            performance_start: ymd(2010, 1, 1),
            performance_end: ymd(2025, 7, 31),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.synthetic.observations_per_ticker == 0 {
            return Err(ConfigError::Invalid(
                "synthetic.observations_per_ticker must be at least 1".into(),
            ));
        }
        if self.synthetic.performance_start > self.synthetic.performance_end {
            return Err(ConfigError::Invalid(format!(
                "synthetic.performance_start {} is after performance_end {}",
                self.synthetic.performance_start, self.synthetic.performance_end
            )));
        }
        Ok(())
    }
}
