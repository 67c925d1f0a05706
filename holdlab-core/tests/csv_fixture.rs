//! Integration tests for CSV ingest + validation using the frozen sample extract.

use chrono::NaiveDate;
use holdlab_core::data::{holdings_to_csv_string, read_holdings_csv, read_holdings_csv_path};
use holdlab_core::domain::Column;
use holdlab_core::reference::{
    load_or_fallback, load_table, CountryRegionMap, CurrencyRules, ReferenceError,
};
use holdlab_core::validate::RegionPair;
use holdlab_core::{HoldingsValidator, ValidationIssue, ValidationOptions, ValidationOutcome};
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn reference() -> (CurrencyRules, CountryRegionMap) {
    let currencies = load_table(&fixture_dir().join("valid_currencies.json")).unwrap();
    let regions = load_table(&fixture_dir().join("country_region_map.json")).unwrap();
    (currencies, regions)
}

fn validate_sample() -> ValidationOutcome {
    let ingest = read_holdings_csv_path(&fixture_dir().join("holdings_sample.csv")).unwrap();
    assert!(ingest.coerced.is_empty());
    let (currencies, regions) = reference();
    HoldingsValidator::new(&currencies, &regions)
        .with_options(ValidationOptions::as_of(
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        ))
        .validate(&ingest.dataset)
}

#[test]
fn fixture_reference_tables_load() {
    let (currencies, regions) = reference();
    assert_eq!(currencies.len(), 3);
    assert_eq!(currencies.limits_for(Some("JPY")).price_min, 1.0);
    assert_eq!(regions.region_for("Germany"), Some("Europe"));
}

#[test]
fn sample_extract_reports_expected_issues() {
    let out = validate_sample();

    // Row checks run in sorted order (AAPL, SAP, SONY, XYZ) but cite input rows.
    assert_eq!(
        out.issues,
        vec![
            ValidationIssue::NegativeCostBasis {
                row: 3,
                cost_basis: -5.0,
            },
            ValidationIssue::PriceOutOfRange {
                row: 2,
                price: Some(0.5),
                currency: Some("JPY".into()),
                price_min: 1.0,
                price_max: 1_000_000.0,
            },
            ValidationIssue::RegionMismatches {
                pairs: vec![RegionPair {
                    hq_country: Some("Germany".into()),
                    region_name: Some("Asia".into()),
                }],
            },
            ValidationIssue::InvalidCurrencyCodes {
                values: vec![Some("CHF".into())],
            },
            ValidationIssue::InvalidPositionFlags {
                values: vec![Some("HOLD".into())],
            },
        ]
    );

    assert_eq!(
        out.messages()[..2],
        [
            "Row 3: COSTBASIS -5.0 is negative".to_string(),
            "Row 2: PRICE 0.5 out of range for JPY [1-1000000]".to_string(),
        ]
    );
}

#[test]
fn sample_extract_is_cleaned_and_imputed() {
    let out = validate_sample();
    assert_eq!(out.imputed_prices, 1);

    let aapl: Vec<_> = out
        .cleaned
        .rows
        .iter()
        .filter(|r| r.ticker.as_deref() == Some("AAPL"))
        .collect();
    assert_eq!(aapl.len(), 2);
    assert_eq!(aapl[1].price, Some(190.0));
    assert_eq!(aapl[1].history_date.as_deref(), Some("2024-05-02"));

    // Cleaned data survives a CSV round trip with the imputed price in place.
    let csv = holdings_to_csv_string(&out.cleaned).unwrap();
    let reread = read_holdings_csv(csv.as_bytes()).unwrap();
    assert!(reread.coerced.is_empty());
    assert_eq!(reread.dataset, out.cleaned);
    assert_eq!(
        reread.dataset.rows[1].field(Column::Price).render().as_deref(),
        Some("190")
    );
}

#[test]
fn dropping_a_column_stops_validation() {
    let ingest = read_holdings_csv_path(&fixture_dir().join("holdings_sample.csv")).unwrap();
    let mut dataset = ingest.dataset;
    dataset.drop_column("PORTFOLIOCODE");

    let (currencies, regions) = reference();
    let out = HoldingsValidator::new(&currencies, &regions).validate(&dataset);

    assert!(out.schema_mismatch());
    assert_eq!(out.messages(), vec![r#"Missing columns: {"PORTFOLIOCODE"}"#]);
    assert_eq!(out.cleaned, dataset);
}

#[test]
fn missing_reference_file_falls_back() {
    let loaded = load_or_fallback::<CurrencyRules>(&fixture_dir().join("no_such_file.json"));
    assert!(loaded.is_fallback());
    assert!(matches!(
        loaded.fallback_reason(),
        Some(ReferenceError::Read { .. })
    ));
    assert_eq!(loaded.value(), &CurrencyRules::fallback());
}
