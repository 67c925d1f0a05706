//! Time-series ordering and price imputation.

use crate::domain::HoldingsRow;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// A row on its way through validation, tagged with its input position
/// and its parsed history date.
#[derive(Debug, Clone)]
pub(crate) struct StagedRow {
    pub source_index: usize,
    pub date: Option<NaiveDate>,
    pub row: HoldingsRow,
}

fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by (TICKER, HISTORYDATE) ascending, nulls last in both keys.
pub(crate) fn sort_by_ticker_and_date(rows: &mut [StagedRow]) {
    rows.sort_by(|a, b| {
        nulls_last(&a.row.ticker, &b.row.ticker).then_with(|| nulls_last(&a.date, &b.date))
    });
}

/// Forward-fill then backward-fill a run of values. Returns how many nulls were filled.
///
/// A run with no known value stays all-null.
pub fn forward_backward_fill(values: &mut [Option<f64>]) -> usize {
    let mut filled = 0;

    let mut last = None;
    for v in values.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => {
                if let Some(prev) = last {
                    *v = Some(prev);
                    filled += 1;
                }
            }
        }
    }

    let mut next = None;
    for v in values.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => {
                if let Some(after) = next {
                    *v = Some(after);
                    filled += 1;
                }
            }
        }
    }

    filled
}

/// Impute missing prices within each ticker group of an already-sorted slice.
///
/// Rows with a null ticker belong to no group and are left untouched.
pub(crate) fn impute_prices(rows: &mut [StagedRow]) -> usize {
    let mut filled = 0;
    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && rows[end].row.ticker == rows[start].row.ticker {
            end += 1;
        }

        if rows[start].row.ticker.is_some() {
            let group = &mut rows[start..end];
            let mut prices: Vec<Option<f64>> = group.iter().map(|r| r.row.price).collect();
            let n = forward_backward_fill(&mut prices);
            if n > 0 {
                for (staged, price) in group.iter_mut().zip(prices) {
                    staged.row.price = price;
                }
                filled += n;
            }
        }

        start = end;
    }
    filled
}
