//! Property tests for validator invariants.
//!
//! Uses proptest to verify:
//! 1. Market value tolerance: mismatches beyond one cent are always reported
//! 2. Price fill: forward then backward fill leaves no gaps when any price exists
//! 3. Idempotence: validating the cleaned output changes nothing further
//! 4. Synthetic data: generated holdings pass against the fallback tables
//! 5. Input order: shuffling rows never changes the cleaned output

use chrono::NaiveDate;
use holdlab_core::domain::{HoldingsDataset, HoldingsRow};
use holdlab_core::reference::{CountryRegionMap, CurrencyRules};
use holdlab_core::synth::{generate_holdings, GenerateOptions, SecurityUniverse};
use holdlab_core::validate::forward_backward_fill;
use holdlab_core::{validate, ValidationIssue, ValidationOptions, ValidationOutcome};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

// ── Helpers ──────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn holding(ticker: &str, date: &str, price: Option<f64>, shares: f64) -> HoldingsRow {
    let p = price.unwrap_or(100.0);
    HoldingsRow {
        cusip: Some("594918104".into()),
        isin_code: Some("US5949181045".into()),
        issue_name: Some(format!("{ticker} Corp")),
        ticker: Some(ticker.into()),
        price,
        shares: Some(shares),
        market_value: Some(p * shares),
        currency_code: Some("USD".into()),
        hq_country: Some("United States".into()),
        issue_country: Some("United States".into()),
        region_name: Some("North America".into()),
        primary_sector_name: Some("Technology".into()),
        primary_subsector_name: Some("Application Software".into()),
        primary_industry_name: Some("Software - Infrastructure".into()),
        dividend_yield: Some(0.7),
        asset_class_name: Some("Equity".into()),
        book_value: Some(shares * 1.2),
        cost_basis: Some(p * 0.9),
        history_date: Some(date.into()),
        position_flag: Some("LONG".into()),
        portfolio_code: Some("PORT001".into()),
        extra: BTreeMap::new(),
    }
}

fn run(rows: Vec<HoldingsRow>) -> ValidationOutcome {
    validate(
        &HoldingsDataset::new(rows),
        &CurrencyRules::fallback(),
        &CountryRegionMap::fallback(),
        &ValidationOptions::as_of(today()),
    )
}

fn has(outcome: &ValidationOutcome, issue: &ValidationIssue) -> bool {
    outcome.issues.contains(issue)
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_shares() -> impl Strategy<Value = f64> {
    (1..10_000u32).prop_map(f64::from)
}

fn arb_ticker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["AAPL", "MSFT", "JPM", "NVDA"])
}

fn arb_date() -> impl Strategy<Value = String> {
    (0..400i64).prop_map(|offset| {
        (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset))
            .to_string()
    })
}

fn arb_rows() -> impl Strategy<Value = Vec<HoldingsRow>> {
    prop::collection::vec(
        (
            arb_ticker(),
            arb_date(),
            prop::option::weighted(0.7, arb_price()),
            arb_shares(),
        ),
        1..40,
    )
    .prop_map(|layouts| {
        layouts
            .into_iter()
            .map(|(t, d, p, s)| holding(t, &d, p, s))
            .collect()
    })
}

// ── 1. Market value tolerance ────────────────────────────────────────

proptest! {
    #[test]
    fn market_value_off_by_more_than_a_cent_is_reported(
        price in arb_price(),
        shares in arb_shares(),
        delta in 0.02..1_000.0_f64,
        sign in prop::bool::ANY,
    ) {
        let mut row = holding("AAPL", "2024-05-01", Some(price), shares);
        row.market_value = Some(price * shares + if sign { delta } else { -delta });
        let out = run(vec![row]);
        prop_assert!(has(&out, &ValidationIssue::MarketValueMismatch));
    }

    #[test]
    fn market_value_within_tolerance_passes(
        price in arb_price(),
        shares in arb_shares(),
        delta in -0.005..0.005_f64,
    ) {
        let mut row = holding("AAPL", "2024-05-01", Some(price), shares);
        row.market_value = Some(price * shares + delta);
        let out = run(vec![row]);
        prop_assert!(!has(&out, &ValidationIssue::MarketValueMismatch));
    }
}

// ── 2. Price fill ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn fill_leaves_no_gaps_and_keeps_known_values(
        series in prop::collection::vec(prop::option::weighted(0.5, arb_price()), 1..60),
    ) {
        let mut filled = series.clone();
        let count = forward_backward_fill(&mut filled);

        let known = series.iter().filter(|p| p.is_some()).count();
        if known == 0 {
            prop_assert_eq!(count, 0);
            prop_assert!(filled.iter().all(Option::is_none));
        } else {
            prop_assert_eq!(count, series.len() - known);
            prop_assert!(filled.iter().all(Option::is_some));
            for (before, after) in series.iter().zip(&filled) {
                if before.is_some() {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn filled_value_comes_from_a_neighbour(
        series in prop::collection::vec(prop::option::weighted(0.5, arb_price()), 1..60),
    ) {
        let mut filled = series.clone();
        forward_backward_fill(&mut filled);
        let first_known = series.iter().position(Option::is_some);
        for (i, slot) in series.iter().enumerate() {
            if slot.is_some() {
                continue;
            }
            let expected = series[..i]
                .iter()
                .rev()
                .find_map(|p| *p)
                .or_else(|| first_known.and_then(|k| series[k]));
            prop_assert_eq!(filled[i], expected);
        }
    }
}

// ── 3. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn revalidating_cleaned_output_is_a_no_op(rows in arb_rows()) {
        let first = run(rows);
        let second = validate(
            &first.cleaned,
            &CurrencyRules::fallback(),
            &CountryRegionMap::fallback(),
            &ValidationOptions::as_of(today()),
        );
        prop_assert_eq!(second.imputed_prices, 0);
        prop_assert_eq!(&second.cleaned, &first.cleaned);
    }

    #[test]
    fn cleaned_output_is_sorted_by_ticker_then_date(rows in arb_rows()) {
        let out = run(rows);
        let keys: Vec<_> = out
            .cleaned
            .rows
            .iter()
            .map(|r| (r.ticker.clone(), r.history_date.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}

// ── 4. Synthetic data ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn synthetic_holdings_are_clean(seed in any::<u64>(), observations in 1..5usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut options = GenerateOptions::new(500, today());
        options.observations_per_ticker = observations;
        let rows = generate_holdings(
            &SecurityUniverse::default_universe(),
            &BTreeMap::new(),
            &CountryRegionMap::fallback(),
            &options,
            &mut rng,
        );
        let out = run(rows);
        prop_assert!(out.is_clean(), "issues: {:?}", out.messages());
    }
}

// ── 5. Input order ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn shuffling_distinct_rows_does_not_change_cleaned_output(
        rows in arb_rows(),
        seed in any::<u64>(),
    ) {
        // Keep one row per (ticker, date) so the stable sort has no ties.
        let mut seen = std::collections::HashSet::new();
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|r| seen.insert((r.ticker.clone(), r.history_date.clone())))
            .collect();

        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        prop_assert_eq!(run(rows).cleaned, run(shuffled).cleaned);
    }
}

// ── Fixed scenarios ──────────────────────────────────────────────────

#[test]
fn non_positive_shares_reported_once() {
    let out = run(vec![
        holding("AAPL", "2024-05-01", Some(190.0), 0.0),
        holding("MSFT", "2024-05-01", Some(410.0), -5.0),
    ]);
    let count = out
        .issues
        .iter()
        .filter(|i| **i == ValidationIssue::NonPositiveShares)
        .count();
    assert_eq!(count, 1);
}

#[test]
fn japan_labelled_europe_is_a_region_mismatch() {
    let mut row = holding("SONY", "2024-05-01", Some(90.0), 10.0);
    row.hq_country = Some("Japan".into());
    row.issue_country = Some("Japan".into());
    row.region_name = Some("Europe".into());
    let out = run(vec![row]);
    let message = out
        .messages()
        .into_iter()
        .find(|m| m.starts_with("HQCOUNTRY-region mismatches"))
        .expect("mismatch reported");
    assert!(message.contains(r#""HQCOUNTRY": "Japan""#));
    assert!(message.contains(r#""REGIONNAME": "Europe""#));
}

#[test]
fn duplicate_ticker_dates_are_reported() {
    let out = run(vec![
        holding("AAPL", "2024-05-01", Some(190.0), 10.0),
        holding("AAPL", "2024/05/01", Some(191.0), 10.0),
    ]);
    assert!(has(&out, &ValidationIssue::DuplicateTickerDates));
}

#[test]
fn price_gaps_fill_within_each_ticker_only() {
    let out = run(vec![
        holding("AAPL", "2024-05-02", None, 10.0),
        holding("MSFT", "2024-05-01", Some(410.0), 10.0),
        holding("AAPL", "2024-05-01", Some(190.0), 10.0),
        holding("MSFT", "2024-05-02", None, 10.0),
        holding("NVDA", "2024-05-01", None, 10.0),
        holding("NVDA", "2024-05-02", Some(120.0), 10.0),
    ]);
    let prices: Vec<_> = out.cleaned.rows.iter().map(|r| r.price).collect();
    assert_eq!(
        prices,
        vec![
            Some(190.0),
            Some(190.0),
            Some(410.0),
            Some(410.0),
            Some(120.0),
            Some(120.0)
        ]
    );
    assert_eq!(out.imputed_prices, 3);
}
