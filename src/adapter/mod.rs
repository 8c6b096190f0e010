//! Adapter contract: the seam between the pushdown core and a concrete
//! data source.
//!
//! An adapter declares its columns, estimates scan cost, and produces
//! rows for a set of bounds. Everything else (planning, token handling,
//! literal parsing, cursor state) lives in the core; the adapter never
//! sees host-engine machinery.
//!
//! # Design Principles
//!
//! - Row production is a lazy, fallible iterator; the core pulls one
//!   row at a time and never buffers on the adapter's behalf
//! - Mutation is opt-in; the defaults reject it
//! - Limit, offset, and projection are capability-gated so the core can
//!   apply them host-side when the adapter cannot
//! - One adapter instance is single-writer; concurrent mutation must be
//!   serialized by the caller

mod errors;
mod memory;
mod registry;

pub use errors::{AdapterError, AdapterResult};
pub use memory::MemoryAdapter;
pub use registry::{AdapterFactory, AdapterRegistry};

use std::collections::HashMap;

use crate::filters::{Filter, Operator};
use crate::planner::DEFAULT_FIXED_COST;
use crate::schema::{SortDirection, TableSchema};
use crate::value::Value;

/// One row as produced by an adapter: a row id (absent for sources
/// without stable identity) plus one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub rowid: Option<i64>,
    pub values: HashMap<String, Value>,
}

impl Row {
    pub fn new(rowid: Option<i64>, values: HashMap<String, Value>) -> Self {
        Self { rowid, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

/// Lazy, fallible row sequence returned by [`Adapter::scan`].
pub type RowStream<'a> = Box<dyn Iterator<Item = AdapterResult<Row>> + 'a>;

/// Scan modifiers beyond bounds and order. Only honored by adapters
/// that declare the matching capability; the core re-applies anything
/// the adapter cannot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Columns the caller will actually read, for adapters that can
    /// avoid fetching the rest.
    pub requested_columns: Option<Vec<String>>,
}

/// A concrete data source exposed as a scannable table.
pub trait Adapter {
    /// The table's column registry. Stable for the adapter's lifetime.
    fn columns(&self) -> &TableSchema;

    /// Cost estimate for a scan with the given pushed-down filters and
    /// adapter-side sort keys. Must be monotonic in both.
    fn cost(&self, filtered: &[(String, Operator)], order: &[(String, SortDirection)]) -> f64 {
        let _ = (filtered, order);
        DEFAULT_FIXED_COST
    }

    /// Produces the rows matching `bounds`, sorted by `order`.
    fn scan(
        &self,
        bounds: &HashMap<String, Filter>,
        order: &[(String, SortDirection)],
        options: &ScanOptions,
    ) -> AdapterResult<RowStream<'_>>;

    fn supports_limit(&self) -> bool {
        false
    }

    fn supports_offset(&self) -> bool {
        false
    }

    fn supports_requested_columns(&self) -> bool {
        false
    }

    /// Inserts a row, returning its assigned row id.
    fn insert_row(&mut self, row: Row) -> AdapterResult<i64> {
        let _ = row;
        Err(AdapterError::Unsupported("insert"))
    }

    fn delete_row(&mut self, rowid: i64) -> AdapterResult<()> {
        let _ = rowid;
        Err(AdapterError::Unsupported("delete"))
    }

    /// Replaces a row in place. The default delete+insert keeps the
    /// row id stable.
    fn update_row(&mut self, rowid: i64, row: Row) -> AdapterResult<()> {
        self.delete_row(rowid)?;
        let mut row = row;
        row.rowid = Some(rowid);
        self.insert_row(row)?;
        Ok(())
    }

    /// Releases any resources held by the adapter.
    fn close(&mut self) -> AdapterResult<()> {
        Ok(())
    }
}
