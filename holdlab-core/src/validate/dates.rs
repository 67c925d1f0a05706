//! HISTORYDATE parsing and the accepted date window.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Canonical textual form of a history date.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Parse a history date leniently. Anything unparseable is `None`, never an error.
pub fn parse_history_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Earliest accepted history date.
pub fn earliest_history_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest accepted history date: one day after `today`.
pub fn latest_history_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

pub fn in_history_window(date: NaiveDate, today: NaiveDate) -> bool {
    date >= earliest_history_date() && date <= latest_history_date(today)
}
