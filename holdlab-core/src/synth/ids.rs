//! Fake identifiers, dates, and classification helpers.

use chrono::{Duration, NaiveDate};
use rand::Rng;

/// CUSIP alphabet: digits plus upper-case letters without I and O.
const CUSIP_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// How far back a random history date may go.
pub const HISTORY_LOOKBACK_DAYS: i64 = 3 * 365;

pub fn fake_cusip<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..9)
        .map(|_| CUSIP_ALPHABET[rng.gen_range(0..CUSIP_ALPHABET.len())] as char)
        .collect()
}

/// `US` followed by ten random digits.
pub fn fake_isin<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: String = (0..10)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("US{digits}")
}

/// A date between `today - HISTORY_LOOKBACK_DAYS` and `today`, inclusive.
pub fn random_history_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..=HISTORY_LOOKBACK_DAYS))
}

const SUBSECTOR_KEYWORDS: [(&str, &str); 7] = [
    ("software", "Application Software"),
    ("hardware", "Consumer Electronics"),
    ("semiconductors", "Chip Makers"),
    ("bank", "Commercial Banks"),
    ("retail", "E-commerce"),
    ("media", "Streaming"),
    ("pharma", "Biopharma"),
];

/// Map an industry name onto a coarse subsector by keyword (first match wins).
pub fn derive_subsector(industry: &str) -> &'static str {
    let lower = industry.to_lowercase();
    SUBSECTOR_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, subsector)| *subsector)
        .unwrap_or("Other Subsector")
}
