//! Random holdings generation.

use super::ids::{derive_subsector, fake_cusip, fake_isin, random_history_date, HISTORY_LOOKBACK_DAYS};
use super::universe::SecurityUniverse;
use super::SynthError;
use crate::domain::{HoldingsRow, PositionFlag};
use crate::reference::CountryRegionMap;
use chrono::{Duration, NaiveDate};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::BTreeMap;

/// Portfolio code used for tickers without an assignment.
pub const DEFAULT_PORTFOLIO: &str = "DEFAULT_PORTFOLIO";

/// Region used when a security's country is not in the region map.
pub const DEFAULT_REGION: &str = "North America";

/// Share of positions generated as SHORT.
pub const SHORT_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Upper bound on the number of rows produced.
    pub max_count: usize,
    /// Distinct history dates generated per ticker.
    pub observations_per_ticker: usize,
    pub today: NaiveDate,
}

impl GenerateOptions {
    pub fn new(max_count: usize, today: NaiveDate) -> Self {
        Self {
            max_count,
            observations_per_ticker: 1,
            today,
        }
    }
}

/// Give every ticker a randomly chosen portfolio code.
pub fn assign_portfolio_codes<R: Rng + ?Sized>(
    tickers: &[&str],
    portfolio_codes: &[String],
    rng: &mut R,
) -> Result<BTreeMap<String, String>, SynthError> {
    if portfolio_codes.is_empty() {
        return Err(SynthError::NoPortfolioCodes);
    }
    let mut assigned = BTreeMap::new();
    for ticker in tickers {
        if let Some(code) = portfolio_codes.choose(rng) {
            assigned.insert(ticker.to_string(), code.clone());
        }
    }
    Ok(assigned)
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn history_dates<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate, n: usize) -> Vec<NaiveDate> {
    if n == 1 {
        return vec![random_history_date(rng, today)];
    }
    let span = (HISTORY_LOOKBACK_DAYS + 1) as usize;
    index::sample(rng, span, n.min(span))
        .into_iter()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// Generate holdings rows for the securities in `universe`, in universe order.
///
/// Every row is internally consistent: MARKETVALUE is PRICE × SHARES
/// rounded to cents, REGIONNAME follows `regions`, and a ticker never
/// repeats a history date.
pub fn generate_holdings<R: Rng + ?Sized>(
    universe: &SecurityUniverse,
    assignments: &BTreeMap<String, String>,
    regions: &CountryRegionMap,
    options: &GenerateOptions,
    rng: &mut R,
) -> Vec<HoldingsRow> {
    let mut rows = Vec::new();

    for security in &universe.securities {
        if rows.len() >= options.max_count {
            break;
        }

        let cusip = fake_cusip(rng);
        let isin = fake_isin(rng);
        let region = regions
            .region_for(&security.country)
            .unwrap_or(DEFAULT_REGION)
            .to_string();
        let portfolio = assignments
            .get(&security.ticker)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PORTFOLIO)
            .to_string();

        let remaining = options.max_count - rows.len();
        let n = options.observations_per_ticker.max(1).min(remaining);

        for date in history_dates(rng, options.today, n) {
            let price = round_cents(rng.gen_range(10.0..500.0));
            let shares = rng.gen_range(100..=10_000) as f64;
            let flag = if rng.gen::<f64>() > SHORT_PROBABILITY {
                PositionFlag::Long
            } else {
                PositionFlag::Short
            };

            rows.push(HoldingsRow {
                cusip: Some(cusip.clone()),
                isin_code: Some(isin.clone()),
                issue_name: Some(security.issue_name.clone()),
                ticker: Some(security.ticker.clone()),
                price: Some(price),
                shares: Some(shares),
                market_value: Some(round_cents(price * shares)),
                currency_code: Some(security.currency.clone()),
                hq_country: Some(security.country.clone()),
                issue_country: Some(security.country.clone()),
                region_name: Some(region.clone()),
                primary_sector_name: Some(security.sector.clone()),
                primary_subsector_name: Some(derive_subsector(&security.industry).to_string()),
                primary_industry_name: Some(security.industry.clone()),
                dividend_yield: Some(round_cents(security.dividend_yield)),
                asset_class_name: Some("Equity".into()),
                book_value: Some(round_cents(rng.gen_range(0.5..2.0) * shares)),
                cost_basis: Some(round_cents(rng.gen_range(0.6..1.1) * price)),
                history_date: Some(date.to_string()),
                position_flag: Some(flag.as_str().to_string()),
                portfolio_code: Some(portfolio.clone()),
                extra: BTreeMap::new(),
            });
        }
    }

    rows
}
