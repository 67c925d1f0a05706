//! Holdings domain types.

pub mod column;
pub mod dataset;
pub mod holding;

pub use column::{required_column_names, Column, ColumnKind, HELPER_COLUMNS};
pub use dataset::HoldingsDataset;
pub use holding::{FieldRef, HoldingsRow, NotANumber, PositionFlag};
