//! Row and column invariant checks.
//!
//! Every check is read-only: it appends to the issue list and never touches
//! a row. A missing numeric value fails every numeric predicate.

use super::dates::in_history_window;
use super::impute::StagedRow;
use super::issue::{RegionPair, ValidationIssue};
use crate::domain::{Column, PositionFlag};
use crate::reference::{CountryRegionMap, CurrencyRules};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// Absolute tolerance for MARKETVALUE vs PRICE * SHARES.
pub const MARKET_VALUE_TOLERANCE: f64 = 0.01;

/// Accepted DIVIDENDYIELD range, in percent.
pub const DIVIDEND_YIELD_RANGE: (f64, f64) = (0.0, 500.0);

pub(crate) fn price_and_cost_basis(
    rows: &[StagedRow],
    currencies: &CurrencyRules,
    issues: &mut Vec<ValidationIssue>,
) {
    for staged in rows {
        let row = &staged.row;
        let limits = currencies.limits_for(row.currency_code.as_deref());

        let price_ok = matches!(row.price, Some(p) if limits.price_in_range(p));
        if !price_ok {
            issues.push(ValidationIssue::PriceOutOfRange {
                row: staged.source_index,
                price: row.price,
                currency: row.currency_code.clone(),
                price_min: limits.price_min,
                price_max: limits.price_max,
            });
        }

        match row.cost_basis {
            Some(cb) if cb < 0.0 => issues.push(ValidationIssue::NegativeCostBasis {
                row: staged.source_index,
                cost_basis: cb,
            }),
            Some(cb) if cb > limits.costbasis_max => {
                issues.push(ValidationIssue::CostBasisAboveMax {
                    row: staged.source_index,
                    cost_basis: cb,
                    currency: row.currency_code.clone(),
                    costbasis_max: limits.costbasis_max,
                })
            }
            _ => {}
        }
    }
}

pub(crate) fn valuation(rows: &[StagedRow], issues: &mut Vec<ValidationIssue>) {
    if !rows.iter().all(|r| matches!(r.row.shares, Some(s) if s > 0.0)) {
        issues.push(ValidationIssue::NonPositiveShares);
    }

    let market_value_ok = |r: &StagedRow| match (r.row.market_value, r.row.price, r.row.shares) {
        (Some(mv), Some(p), Some(s)) => (mv - p * s).abs() < MARKET_VALUE_TOLERANCE,
        _ => false,
    };
    if !rows.iter().all(market_value_ok) {
        issues.push(ValidationIssue::MarketValueMismatch);
    }

    let (lo, hi) = DIVIDEND_YIELD_RANGE;
    if !rows
        .iter()
        .all(|r| matches!(r.row.dividend_yield, Some(d) if d >= lo && d <= hi))
    {
        issues.push(ValidationIssue::DividendYieldOutOfRange);
    }

    if !rows.iter().all(|r| matches!(r.row.book_value, Some(b) if b >= 0.0)) {
        issues.push(ValidationIssue::NegativeBookValue);
    }
}

fn unknown_values<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    known: impl Fn(&str) -> bool,
) -> BTreeSet<String> {
    values
        .flatten()
        .filter(|v| !known(v))
        .map(str::to_string)
        .collect()
}

pub(crate) fn geography(
    rows: &[StagedRow],
    regions: &CountryRegionMap,
    issues: &mut Vec<ValidationIssue>,
) {
    let invalid_hq = unknown_values(rows.iter().map(|r| r.row.hq_country.as_deref()), |c| {
        regions.is_country(c)
    });
    if !invalid_hq.is_empty() {
        issues.push(ValidationIssue::InvalidHqCountries { values: invalid_hq });
    }

    let invalid_issue = unknown_values(rows.iter().map(|r| r.row.issue_country.as_deref()), |c| {
        regions.is_country(c)
    });
    if !invalid_issue.is_empty() {
        issues.push(ValidationIssue::InvalidIssueCountries {
            values: invalid_issue,
        });
    }

    let invalid_regions = unknown_values(rows.iter().map(|r| r.row.region_name.as_deref()), |r| {
        regions.is_region(r)
    });
    if !invalid_regions.is_empty() {
        issues.push(ValidationIssue::InvalidRegions {
            values: invalid_regions,
        });
    }

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for staged in rows {
        let row = &staged.row;
        let expected = row.hq_country.as_deref().and_then(|c| regions.region_for(c));
        let matches = matches!((expected, row.region_name.as_deref()), (Some(e), Some(r)) if e == r);
        if !matches {
            let pair = RegionPair {
                hq_country: row.hq_country.clone(),
                region_name: row.region_name.clone(),
            };
            if seen.insert(pair.clone()) {
                pairs.push(pair);
            }
        }
    }
    if !pairs.is_empty() {
        issues.push(ValidationIssue::RegionMismatches { pairs });
    }
}

/// Distinct offending values in order of first appearance.
fn distinct_invalid<'a>(
    values: impl Iterator<Item = Option<&'a str>>,
    valid: impl Fn(&str) -> bool,
) -> Vec<Option<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        let ok = v.is_some_and(&valid);
        if !ok && seen.insert(v) {
            out.push(v.map(str::to_string));
        }
    }
    out
}

pub(crate) fn categorical(
    rows: &[StagedRow],
    currencies: &CurrencyRules,
    issues: &mut Vec<ValidationIssue>,
) {
    let bad_currencies = distinct_invalid(rows.iter().map(|r| r.row.currency_code.as_deref()), |c| {
        currencies.contains(c)
    });
    if !bad_currencies.is_empty() {
        issues.push(ValidationIssue::InvalidCurrencyCodes {
            values: bad_currencies,
        });
    }

    let bad_flags = distinct_invalid(rows.iter().map(|r| r.row.position_flag.as_deref()), |f| {
        PositionFlag::parse(f).is_some()
    });
    if !bad_flags.is_empty() {
        issues.push(ValidationIssue::InvalidPositionFlags { values: bad_flags });
    }
}

pub(crate) fn history_dates(rows: &[StagedRow], today: NaiveDate, issues: &mut Vec<ValidationIssue>) {
    if !rows
        .iter()
        .all(|r| matches!(r.date, Some(d) if in_history_window(d, today)))
    {
        issues.push(ValidationIssue::HistoryDateOutOfRange);
    }
}

pub(crate) fn completeness(rows: &[StagedRow], issues: &mut Vec<ValidationIssue>) {
    for column in Column::NON_NULL {
        if rows.iter().any(|r| r.row.field(column).is_null()) {
            issues.push(ValidationIssue::NullValues { column });
        }
    }

    let mut keys = HashSet::with_capacity(rows.len());
    let has_duplicate = rows
        .iter()
        .any(|r| !keys.insert((r.row.ticker.as_deref(), r.date)));
    if has_duplicate {
        issues.push(ValidationIssue::DuplicateTickerDates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HoldingsRow;

    fn staged(index: usize, row: HoldingsRow) -> StagedRow {
        StagedRow {
            source_index: index,
            date: None,
            row,
        }
    }

    fn located(hq: Option<&str>, issue: Option<&str>, region: Option<&str>) -> HoldingsRow {
        HoldingsRow {
            hq_country: hq.map(String::from),
            issue_country: issue.map(String::from),
            region_name: region.map(String::from),
            ..Default::default()
        }
    }

    fn valued(dividend_yield: Option<f64>, book_value: Option<f64>) -> HoldingsRow {
        HoldingsRow {
            price: Some(10.0),
            shares: Some(5.0),
            market_value: Some(50.0),
            dividend_yield,
            book_value,
            ..Default::default()
        }
    }

    fn geography_issues(rows: Vec<HoldingsRow>) -> Vec<ValidationIssue> {
        let rows: Vec<_> = rows.into_iter().enumerate().map(|(i, r)| staged(i, r)).collect();
        let mut issues = Vec::new();
        geography(&rows, &CountryRegionMap::fallback(), &mut issues);
        issues
    }

    fn valuation_issues(rows: Vec<HoldingsRow>) -> Vec<ValidationIssue> {
        let rows: Vec<_> = rows.into_iter().enumerate().map(|(i, r)| staged(i, r)).collect();
        let mut issues = Vec::new();
        valuation(&rows, &mut issues);
        issues
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn known_geography_is_clean() {
        let issues = geography_issues(vec![
            located(Some("Japan"), Some("Japan"), Some("Asia")),
            located(Some("Canada"), Some("United States"), Some("North America")),
        ]);
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn unknown_hq_countries_are_reported_sorted() {
        let issues = geography_issues(vec![
            located(Some("Narnia"), Some("Japan"), Some("Asia")),
            located(Some("Atlantis"), Some("Japan"), Some("Asia")),
            located(Some("Narnia"), Some("Japan"), Some("Asia")),
        ]);
        assert!(issues.contains(&ValidationIssue::InvalidHqCountries {
            values: set(&["Atlantis", "Narnia"]),
        }));
        assert!(!issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::InvalidIssueCountries { .. })));
    }

    #[test]
    fn unknown_issue_countries_are_reported() {
        let issues = geography_issues(vec![located(Some("Japan"), Some("Sealand"), Some("Asia"))]);
        assert_eq!(
            issues,
            vec![ValidationIssue::InvalidIssueCountries {
                values: set(&["Sealand"]),
            }]
        );
    }

    #[test]
    fn unknown_regions_are_reported() {
        let issues = geography_issues(vec![located(Some("Japan"), Some("Japan"), Some("Antarctica"))]);
        assert_eq!(issues[0], ValidationIssue::InvalidRegions { values: set(&["Antarctica"]) });
        assert!(matches!(issues[1], ValidationIssue::RegionMismatches { .. }));
    }

    #[test]
    fn null_countries_and_regions_are_not_invalid_values() {
        let issues = geography_issues(vec![
            located(None, None, None),
            located(Some("Japan"), Some("Japan"), Some("Asia")),
        ]);
        assert!(!issues.iter().any(|i| matches!(
            i,
            ValidationIssue::InvalidHqCountries { .. }
                | ValidationIssue::InvalidIssueCountries { .. }
                | ValidationIssue::InvalidRegions { .. }
        )));
        assert_eq!(
            issues,
            vec![ValidationIssue::RegionMismatches {
                pairs: vec![RegionPair {
                    hq_country: None,
                    region_name: None,
                }],
            }]
        );
    }

    #[test]
    fn dividend_yield_bounds_are_inclusive() {
        let issues = valuation_issues(vec![
            valued(Some(0.0), Some(1.0)),
            valued(Some(500.0), Some(1.0)),
        ]);
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn dividend_yield_outside_range_is_reported_once() {
        let issues = valuation_issues(vec![
            valued(Some(-0.01), Some(1.0)),
            valued(Some(500.01), Some(1.0)),
        ]);
        assert_eq!(issues, vec![ValidationIssue::DividendYieldOutOfRange]);
    }

    #[test]
    fn null_dividend_yield_fails_the_range_check() {
        let issues = valuation_issues(vec![valued(None, Some(1.0))]);
        assert_eq!(issues, vec![ValidationIssue::DividendYieldOutOfRange]);
    }

    #[test]
    fn negative_book_value_is_reported() {
        let issues = valuation_issues(vec![valued(Some(1.0), Some(0.0)), valued(Some(1.0), Some(-3.0))]);
        assert_eq!(issues, vec![ValidationIssue::NegativeBookValue]);
    }

    #[test]
    fn null_book_value_fails_the_sign_check() {
        let issues = valuation_issues(vec![valued(Some(1.0), None)]);
        assert_eq!(issues, vec![ValidationIssue::NegativeBookValue]);
    }
}
