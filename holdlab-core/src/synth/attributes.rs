//! Synthetic portfolio classification attributes.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attribute type → (code, value) choices, in output order.
pub const ATTRIBUTE_OPTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Strategy",
        &[
            ("DLCV", "Domestic Large Cap Value"),
            ("GRO", "Growth-Oriented"),
            ("TH", "Thematic"),
            ("INX", "Index Replication"),
        ],
    ),
    (
        "AssetClass",
        &[
            ("EQTY", "Equities"),
            ("FI", "Fixed Income"),
            ("MULTI", "Multi-Asset"),
            ("ALT", "Alternatives"),
        ],
    ),
    (
        "Vehicle",
        &[
            ("MF", "Mutual Fund"),
            ("SA", "Separate Account"),
            ("SMA", "Sub-Advisory/Mutual Fund"),
        ],
    ),
    (
        "Vehicle Category",
        &[
            ("POOL", "Pooled"),
            ("SEGR", "Segregated"),
            ("TH", "Taft-Hartley"),
            ("E/F", "Endowment/Foundation"),
            ("OTH", "Other"),
        ],
    ),
];

/// One PORTFOLIOATTRIBUTES row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    #[serde(rename = "PORTFOLIOCODE")]
    pub portfolio_code: String,
    #[serde(rename = "ATTRIBUTETYPE")]
    pub attribute_type: String,
    #[serde(rename = "ATTRIBUTETYPECODE")]
    pub attribute_type_code: String,
    #[serde(rename = "ATTRIBUTETYPEVALUE")]
    pub attribute_type_value: String,
}

/// One row per portfolio and attribute type, with a random choice for each.
pub fn generate_attribute_rows<R: Rng + ?Sized>(
    portfolio_codes: &[String],
    rng: &mut R,
) -> Vec<AttributeRow> {
    let mut rows = Vec::with_capacity(portfolio_codes.len() * ATTRIBUTE_OPTIONS.len());
    for code in portfolio_codes {
        for (attribute_type, options) in ATTRIBUTE_OPTIONS {
            if let Some(&(type_code, value)) = options.choose(rng) {
                rows.push(AttributeRow {
                    portfolio_code: code.clone(),
                    attribute_type: attribute_type.into(),
                    attribute_type_code: type_code.into(),
                    attribute_type_value: value.into(),
                });
            }
        }
    }
    rows
}
