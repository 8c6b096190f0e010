//! Scan materialization and row consumption.
//!
//! The planner's token comes back at scan open together with one
//! literal per accepted constraint. This module turns that pair into
//! concrete adapter inputs (a bounds map and an order list) and then
//! drives the adapter's lazy row stream through a pull-based cursor.
//!
//! # Design Principles
//!
//! - Fail fast on plan/argument disagreement; never drop a predicate
//! - An `Impossible` bound short-circuits before the adapter is touched
//! - Rows are pulled one at a time; nothing here buffers the scan
//! - Adapter errors pass through untouched

mod cursor;
mod errors;
mod materialize;
mod rows;

pub use cursor::ScanCursor;
pub use errors::{ScanError, ScanResult};
pub use materialize::{materialize, ScanSpec};
pub use rows::filter_rows;
