//! HoldLab Core: holdings domain types, reference data, validation and imputation.
//!
//! This crate contains everything needed to check a holdings extract before
//! it is loaded downstream:
//! - Domain types (the 21-column holdings row, datasets, position flags)
//! - Reference tables (per-currency price/cost-basis limits, country → region map)
//! - The validator: column-set check, date normalization, per-ticker price
//!   imputation and row/column invariant checks
//! - CSV ingest and export
//! - Synthetic holdings generation for demos and tests
//!
//! The core performs no logging and no network I/O.

pub mod data;
pub mod domain;
pub mod reference;
pub mod synth;
pub mod validate;

pub use validate::{validate, HoldingsValidator, ValidationIssue, ValidationOptions, ValidationOutcome};
