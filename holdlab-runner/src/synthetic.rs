//! Seeded synthetic datasets built from the `[synthetic]` config section.
//!
//! Holdings, performance and attribute tables each draw from their own
//! generator seeded with `seed`, so regenerating one never shifts another.

use crate::config::SyntheticConfig;
use crate::reference::ReferenceData;
use chrono::NaiveDate;
use holdlab_core::domain::HoldingsDataset;
use holdlab_core::synth::{
    assign_portfolio_codes, generate_attribute_rows, generate_holdings,
    generate_performance_rows, AttributeRow, GenerateOptions, PerformanceRow, SecurityUniverse,
    SynthError,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Generate a dataset. The same config, reference data and `today` always
/// give the same rows.
pub fn synthesize(
    config: &SyntheticConfig,
    reference: &ReferenceData,
    today: NaiveDate,
) -> Result<HoldingsDataset, SynthError> {
    let mut universe = match &config.universe {
        Some(path) => SecurityUniverse::from_file(path)?,
        None => SecurityUniverse::default_universe(),
    };

    let mut rng = StdRng::seed_from_u64(config.seed);
    universe.securities.shuffle(&mut rng);

    let tickers = universe.tickers();
    let assignments = assign_portfolio_codes(&tickers, &config.portfolio_codes, &mut rng)?;

    let options = GenerateOptions {
        max_count: config.max_count,
        observations_per_ticker: config.observations_per_ticker,
        today,
    };
    let rows = generate_holdings(
        &universe,
        &assignments,
        &reference.regions,
        &options,
        &mut rng,
    );
    info!(
        rows = rows.len(),
        tickers = universe.len(),
        seed = config.seed,
        "generated synthetic holdings"
    );
    Ok(HoldingsDataset::new(rows))
}

/// Monthly performance rows for every configured portfolio code.
pub fn synthesize_performance(config: &SyntheticConfig) -> Vec<PerformanceRow> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let rows = generate_performance_rows(
        &config.portfolio_codes,
        config.performance_start,
        config.performance_end,
        &mut rng,
    );
    info!(
        rows = rows.len(),
        portfolios = config.portfolio_codes.len(),
        "generated synthetic performance"
    );
    rows
}

/// Classification attributes for every configured portfolio code.
pub fn synthesize_attributes(config: &SyntheticConfig) -> Vec<AttributeRow> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let rows = generate_attribute_rows(&config.portfolio_codes, &mut rng);
    info!(rows = rows.len(), "generated synthetic attributes");
    rows
}
