//! # dltrack Ledger
//!
//! The ledger is a CSV time series: a `date` column followed by one column per
//! tracked model, one row per run. Columns are only ever added, never removed,
//! and adding one back-fills `0` into every earlier row.
//!
//! [`merge`] folds a day's snapshot into the file; [`table`] reads it back for
//! charting.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod merge;
pub mod table;

pub use merge::*;
pub use table::*;

/// Name of the first ledger column.
pub const DATE_COLUMN: &str = "date";

/// Value written for a model that has no observation in a row.
pub const BACKFILL_VALUE: &str = "0";
