//! Column type registry and schema inference.
//!
//! # Design Principles
//!
//! - Column capabilities are declared explicitly, never discovered by
//!   reflection
//! - Registered columns only ever change their inferred natural order;
//!   kind, filter classes, and exactness are fixed
//! - Lookups are pure: an unsupported operator means "not pushdownable",
//!   never an error

mod errors;
mod infer;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use infer::{analyze, update_order, Inference};
pub use types::{ColumnKind, ColumnType, FilterClass, Order, SortDirection, TableSchema};
