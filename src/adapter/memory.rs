//! In-memory adapter: the reference implementation of the adapter
//! contract, backed by a plain vector of rows.

use std::collections::HashMap;

use crate::filters::{Filter, Operator};
use crate::planner::SimpleCostModel;
use crate::rowid::RowIdManager;
use crate::scan::filter_rows;
use crate::schema::{analyze, update_order, ColumnKind, ColumnType, FilterClass, Order, SortDirection, TableSchema};
use crate::value::Value;

use super::errors::AdapterResult;
use super::{Adapter, Row, RowStream, ScanOptions};

/// Filter classes every in-memory column can evaluate. `Equality`
/// comes before `Range` so a lone `=` folds to `Equal` instead of a
/// degenerate point range.
const MEMORY_FILTERS: [FilterClass; 5] = [
    FilterClass::Equality,
    FilterClass::Inequality,
    FilterClass::Range,
    FilterClass::IsNull,
    FilterClass::IsNotNull,
];

/// A mutable table held entirely in memory.
///
/// Column kinds and natural order are inferred from the seed rows; the
/// order is kept current across inserts so the planner can keep
/// consuming order-bys for data that stays sorted. Physical slots stay
/// aligned one-to-one with the row-id manager's walk, deleted rows
/// included.
pub struct MemoryAdapter {
    schema: TableSchema,
    slots: Vec<Option<HashMap<String, Value>>>,
    row_ids: RowIdManager,
    /// Rows ever stored, monotone; keeps inference from re-establishing
    /// an order that a past row already violated.
    rows_seen: usize,
}

impl MemoryAdapter {
    /// Builds a table from seed rows. `columns` fixes the column order;
    /// kinds and natural order are inferred from the data (a column
    /// with no non-null values defaults to text).
    pub fn new(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: Vec<HashMap<String, Value>>,
    ) -> AdapterResult<Self> {
        let inference = analyze(rows.iter().cloned().map(|values| Row::new(None, values)));

        let mut schema = TableSchema::new();
        for name in columns {
            let name = name.into();
            let kind = inference
                .kinds
                .get(&name)
                .copied()
                .unwrap_or(ColumnKind::Text);
            let order = inference.orders.get(&name).copied().unwrap_or(Order::None);
            schema = schema.column(
                &name,
                ColumnType::new(kind)
                    .with_filters(MEMORY_FILTERS)
                    .with_order(order)
                    .exact(),
            )?;
        }

        let count = rows.len();
        Ok(Self {
            schema,
            slots: rows.into_iter().map(Some).collect(),
            row_ids: RowIdManager::contiguous(count as i64),
            rows_seen: count,
        })
    }

    /// Live rows in physical order, paired with their ids.
    fn live_rows(&self) -> Vec<Row> {
        self.row_ids
            .slots()
            .zip(self.slots.iter())
            .filter_map(|(slot, values)| match (slot.id(), values) {
                (Some(id), Some(values)) => Some(Row::new(Some(id), values.clone())),
                _ => None,
            })
            .collect()
    }

    /// Physical position of a live row id.
    fn position_of(&self, rowid: i64) -> Option<usize> {
        self.row_ids.slots().position(|slot| slot.id() == Some(rowid))
    }

    /// Folds a newly stored row into each column's declared order.
    ///
    /// The new row is checked against both physical neighbors: a
    /// non-append insert that lands mid-table can break an order its
    /// preceding neighbor alone would tolerate.
    fn refresh_order(&mut self, position: usize, values: &HashMap<String, Value>) {
        let previous = self.slots[..position]
            .iter()
            .rev()
            .find_map(|slot| slot.as_ref());
        let next = self.slots[position..].iter().find_map(|slot| slot.as_ref());
        let names: Vec<String> = self.schema.names().map(String::from).collect();
        for name in names {
            let current = self.schema.get(&name).map(|c| c.order).unwrap_or(Order::None);
            let value = values.get(&name).cloned().unwrap_or(Value::Null);
            let mut order = update_order(
                current,
                previous.and_then(|row| row.get(&name)),
                &value,
                self.rows_seen,
            );
            if let Some(next) = next {
                order = update_order(
                    order,
                    Some(&value),
                    next.get(&name).unwrap_or(&Value::Null),
                    self.rows_seen,
                );
            }
            self.schema.set_order(&name, order);
        }
    }
}

impl Adapter for MemoryAdapter {
    fn columns(&self) -> &TableSchema {
        &self.schema
    }

    fn cost(&self, filtered: &[(String, Operator)], order: &[(String, SortDirection)]) -> f64 {
        SimpleCostModel::new(self.row_ids.live_count(), 0.0).estimate(filtered.len(), order.len())
    }

    fn scan(
        &self,
        bounds: &HashMap<String, Filter>,
        order: &[(String, SortDirection)],
        options: &ScanOptions,
    ) -> AdapterResult<RowStream<'_>> {
        let rows = filter_rows(self.live_rows(), bounds, order, options);
        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn supports_limit(&self) -> bool {
        true
    }

    fn supports_offset(&self) -> bool {
        true
    }

    fn supports_requested_columns(&self) -> bool {
        true
    }

    fn insert_row(&mut self, row: Row) -> AdapterResult<i64> {
        let rowid = self.row_ids.insert(row.rowid)?;
        let position = self.position_of(rowid).unwrap_or(self.slots.len());
        self.rows_seen += 1;
        self.refresh_order(position, &row.values);
        self.slots.insert(position, Some(row.values));
        Ok(rowid)
    }

    fn delete_row(&mut self, rowid: i64) -> AdapterResult<()> {
        let position = self.position_of(rowid);
        self.row_ids.delete(rowid)?;
        if let Some(position) = position {
            self.slots[position] = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn people() -> MemoryAdapter {
        MemoryAdapter::new(
            ["name", "age"],
            vec![
                values(&[("name", Value::Text("Alice".into())), ("age", Value::Int(20))]),
                values(&[("name", Value::Text("Bob".into())), ("age", Value::Int(23))]),
                values(&[("name", Value::Text("Charlie".into())), ("age", Value::Int(31))]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_schema_is_inferred_from_seed_rows() {
        let adapter = people();
        let schema = adapter.columns();
        assert_eq!(schema.get("name").unwrap().kind, ColumnKind::Text);
        assert_eq!(schema.get("age").unwrap().kind, ColumnKind::Int);
        assert_eq!(schema.get("age").unwrap().order, Order::Ascending);
        assert!(schema.get("age").unwrap().exact);
    }

    #[test]
    fn test_scan_applies_bounds() {
        let adapter = people();
        let mut bounds = HashMap::new();
        bounds.insert(
            "age".to_string(),
            Filter::range(Some(Value::Int(20)), None, false, false),
        );
        let rows: Vec<Row> = adapter
            .scan(&bounds, &[], &ScanOptions::default())
            .unwrap()
            .collect::<AdapterResult<_>>()
            .unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|row| row.get("name").cloned())
            .collect();
        assert_eq!(
            names,
            vec![
                Some(Value::Text("Bob".into())),
                Some(Value::Text("Charlie".into())),
            ]
        );
    }

    #[test]
    fn test_mutation_round_trip() {
        let mut adapter = people();
        let rowid = adapter
            .insert_row(Row::new(
                None,
                values(&[("name", Value::Text("Dave".into())), ("age", Value::Int(40))]),
            ))
            .unwrap();
        assert_eq!(rowid, 3);

        adapter.delete_row(1).unwrap();

        let rows: Vec<Row> = adapter
            .scan(&HashMap::new(), &[], &ScanOptions::default())
            .unwrap()
            .collect::<AdapterResult<_>>()
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|row| row.rowid).collect();
        assert_eq!(ids, vec![Some(0), Some(2), Some(3)]);
    }

    #[test]
    fn test_ordered_insert_keeps_declared_order() {
        let mut adapter = people();
        adapter
            .insert_row(Row::new(
                None,
                values(&[("name", Value::Text("Zoe".into())), ("age", Value::Int(50))]),
            ))
            .unwrap();
        assert_eq!(adapter.columns().get("age").unwrap().order, Order::Ascending);
    }

    #[test]
    fn test_out_of_order_insert_collapses_declared_order() {
        let mut adapter = people();
        adapter
            .insert_row(Row::new(
                None,
                values(&[("name", Value::Text("Abe".into())), ("age", Value::Int(1))]),
            ))
            .unwrap();
        assert_eq!(adapter.columns().get("age").unwrap().order, Order::None);
    }

    #[test]
    fn test_refill_insert_that_breaks_order_collapses_it() {
        // ages 20, 23, 31 ascending; refilling the deleted middle id
        // with an age larger than its following neighbor breaks the
        // order even though the preceding neighbor tolerates it
        let mut adapter = people();
        adapter.delete_row(1).unwrap();
        adapter
            .insert_row(Row::new(
                Some(1),
                values(&[("name", Value::Text("Bea".into())), ("age", Value::Int(100))]),
            ))
            .unwrap();
        assert_eq!(adapter.columns().get("age").unwrap().order, Order::None);
    }

    #[test]
    fn test_refill_insert_that_keeps_order_keeps_it() {
        let mut adapter = people();
        adapter.delete_row(1).unwrap();
        adapter
            .insert_row(Row::new(
                Some(1),
                values(&[("name", Value::Text("Bea".into())), ("age", Value::Int(22))]),
            ))
            .unwrap();
        assert_eq!(adapter.columns().get("age").unwrap().order, Order::Ascending);
    }

    #[test]
    fn test_update_keeps_the_row_id() {
        let mut adapter = people();
        adapter
            .update_row(
                1,
                Row::new(
                    None,
                    values(&[("name", Value::Text("Bobby".into())), ("age", Value::Int(24))]),
                ),
            )
            .unwrap();
        let rows: Vec<Row> = adapter
            .scan(&HashMap::new(), &[], &ScanOptions::default())
            .unwrap()
            .collect::<AdapterResult<_>>()
            .unwrap();
        let bobby = rows.iter().find(|row| row.rowid == Some(1)).unwrap();
        assert_eq!(bobby.get("name"), Some(&Value::Text("Bobby".into())));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_delete_missing_row_fails() {
        let mut adapter = people();
        assert!(adapter.delete_row(9).is_err());
    }

    #[test]
    fn test_empty_table_defaults_to_text_columns() {
        let adapter = MemoryAdapter::new(["x"], vec![]).unwrap();
        assert_eq!(adapter.columns().get("x").unwrap().kind, ColumnKind::Text);
        let rows: Vec<Row> = adapter
            .scan(&HashMap::new(), &[], &ScanOptions::default())
            .unwrap()
            .collect::<AdapterResult<_>>()
            .unwrap();
        assert!(rows.is_empty());
    }
}
