//! Synthetic monthly portfolio performance series.

use chrono::{Months, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const PERFORMANCE_CATEGORIES: [&str; 2] = ["Equities", "Cash and Equiv."];
pub const PERFORMANCE_CURRENCY: &str = "USD";
pub const PERFORMANCE_FREQUENCY: &str = "Monthly";
pub const PERFORMANCE_TYPE: &str = "Net Return";

/// Monthly return factors are drawn uniformly from this half-open range.
pub const FACTOR_RANGE: (f64, f64) = (-0.05, 0.05);

/// One PORTFOLIOPERFORMANCE row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(rename = "PORTFOLIOCODE")]
    pub portfolio_code: String,
    #[serde(rename = "HISTORYDATE")]
    pub history_date: NaiveDate,
    #[serde(rename = "CURRENCYCODE")]
    pub currency_code: String,
    #[serde(rename = "PERFORMANCECATEGORYNAME")]
    pub performance_category_name: String,
    #[serde(rename = "PERFORMANCEINCEPTIONDATE")]
    pub performance_inception_date: NaiveDate,
    #[serde(rename = "PERFORMANCEFREQUENCY")]
    pub performance_frequency: String,
    #[serde(rename = "PERFORMANCEFACTOR")]
    pub performance_factor: f64,
    #[serde(rename = "PERFORMANCETYPE")]
    pub performance_type: String,
}

/// `start`, `start + 1 month`, ... up to and including `end`.
///
/// Months are added one at a time, so a day past the end of a short month
/// is clamped and stays clamped (Jan 31, Feb 29, Mar 29, ...).
pub fn monthly_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.checked_add_months(Months::new(1));
    }
    dates
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Generate a monthly series per portfolio between `start` and `end`.
///
/// Each portfolio gets a random inception date drawn from the month grid
/// and one row per month from inception on.
pub fn generate_performance_rows<R: Rng + ?Sized>(
    portfolio_codes: &[String],
    start: NaiveDate,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<PerformanceRow> {
    let dates = monthly_dates(start, end);
    let mut rows = Vec::new();

    for code in portfolio_codes {
        let Some(&inception) = dates.choose(rng) else {
            break;
        };
        for &date in dates.iter().filter(|d| **d >= inception) {
            let category = PERFORMANCE_CATEGORIES
                .choose(rng)
                .copied()
                .unwrap_or(PERFORMANCE_CATEGORIES[0]);
            rows.push(PerformanceRow {
                portfolio_code: code.clone(),
                history_date: date,
                currency_code: PERFORMANCE_CURRENCY.into(),
                performance_category_name: category.into(),
                performance_inception_date: inception,
                performance_frequency: PERFORMANCE_FREQUENCY.into(),
                performance_factor: round6(rng.gen_range(FACTOR_RANGE.0..FACTOR_RANGE.1)),
                performance_type: PERFORMANCE_TYPE.into(),
            });
        }
    }
    rows
}
