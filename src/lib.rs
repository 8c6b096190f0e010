//! fedtable - predicate pushdown and constraint algebra for exposing
//! external data sources as SQL tables
//!
//! The host engine plans a scan ([`planner`]), ships the plan across as
//! an opaque token, materializes it back into per-column filters
//! ([`scan`]), and pulls rows from an [`adapter`]. Everything in
//! between (filter folding, literal parsing, row identity, schema
//! inference) lives here so adapters stay small.

pub mod adapter;
pub mod filters;
pub mod planner;
pub mod rowid;
pub mod scan;
pub mod schema;
pub mod value;

pub use value::Value;
