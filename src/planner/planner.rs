//! Index selection: decides, per scan, which predicates and order-bys
//! the adapter handles and which the host engine keeps.

use log::debug;

use crate::adapter::Adapter;
use crate::filters::Operator;
use crate::schema::{Order, SortDirection};

use super::errors::{PlannerError, PlannerResult};
use super::token::IndexToken;

/// Opaque index number handed back verbatim by the host engine at scan
/// open. A single constant: all pushdown state travels in the token.
pub const SCAN_INDEX_NUMBER: i32 = 42;

/// How one accepted constraint is wired at scan open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintUsage {
    /// Zero-based slot of the constraint's literal in the scan arguments.
    pub argv_index: usize,
    /// True when the host engine need not re-check the predicate itself.
    pub omit_check: bool,
}

/// The planner's verdict for one predicate set.
#[derive(Debug, Clone)]
pub struct PushdownPlan {
    /// One entry per candidate constraint; `None` means not pushed down.
    pub constraint_usage: Vec<Option<ConstraintUsage>>,
    pub index_number: i32,
    pub token: IndexToken,
    /// True when the rows come back fully ordered and the host engine
    /// can skip its own sort.
    pub orderby_consumed: bool,
    pub estimated_cost: f64,
}

/// Plans scans against one adapter.
pub struct ScanPlanner<'a> {
    adapter: &'a dyn Adapter,
}

impl<'a> ScanPlanner<'a> {
    pub fn new(adapter: &'a dyn Adapter) -> Self {
        Self { adapter }
    }

    /// Selects the pushdown set for one predicate set.
    ///
    /// A constraint is accepted iff some declared filter class of its
    /// column accepts the operator; accepted constraints get argument
    /// slots in input order. Order-bys are walked in the order given:
    /// columns the adapter can sort on demand are deferred into the
    /// token, columns whose natural order already matches are consumed,
    /// and the first mismatch leaves the sort to the host engine.
    pub fn plan(
        &self,
        constraints: &[(usize, Operator)],
        order_by: &[(usize, bool)],
    ) -> PlannerResult<PushdownPlan> {
        let schema = self.adapter.columns();

        let mut constraint_usage = Vec::with_capacity(constraints.len());
        let mut accepted = Vec::new();
        let mut filtered = Vec::new();
        for &(column_index, operator) in constraints {
            let (name, column) = schema
                .by_index(column_index)
                .ok_or(PlannerError::UnknownColumn(column_index))?;
            if column.class_for(operator).is_some() {
                constraint_usage.push(Some(ConstraintUsage {
                    argv_index: accepted.len(),
                    omit_check: column.exact,
                }));
                accepted.push((column_index, operator));
                filtered.push((name.to_string(), operator));
            } else {
                constraint_usage.push(None);
            }
        }

        let mut deferred_order = Vec::new();
        let mut adapter_order = Vec::new();
        let mut orderby_consumed = true;
        for &(column_index, descending) in order_by {
            let (name, column) = schema
                .by_index(column_index)
                .ok_or(PlannerError::UnknownColumn(column_index))?;
            let direction = if descending {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            if column.order == Order::Any {
                deferred_order.push((column_index, descending));
                adapter_order.push((name.to_string(), direction));
            } else if !column.satisfies(direction) {
                orderby_consumed = false;
                break;
            }
        }

        let estimated_cost = self.adapter.cost(&filtered, &adapter_order);
        debug!(
            "Pushdown plan: {}/{} constraints accepted, {} order-bys deferred, \
             orderby_consumed={orderby_consumed}, cost={estimated_cost}",
            accepted.len(),
            constraints.len(),
            deferred_order.len(),
        );

        Ok(PushdownPlan {
            constraint_usage,
            index_number: SCAN_INDEX_NUMBER,
            token: IndexToken::new(accepted, deferred_order),
            orderby_consumed,
            estimated_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Adapter, AdapterResult, RowStream, ScanOptions};
    use crate::filters::Filter;
    use crate::schema::{ColumnKind, ColumnType, FilterClass, TableSchema};
    use std::collections::HashMap;

    struct FixedCostAdapter {
        schema: TableSchema,
        cost: f64,
    }

    impl Adapter for FixedCostAdapter {
        fn columns(&self) -> &TableSchema {
            &self.schema
        }

        fn cost(&self, _filtered: &[(String, Operator)], _order: &[(String, SortDirection)]) -> f64 {
            self.cost
        }

        fn scan(
            &self,
            _bounds: &HashMap<String, Filter>,
            _order: &[(String, SortDirection)],
            _options: &ScanOptions,
        ) -> AdapterResult<RowStream<'_>> {
            Ok(Box::new(std::iter::empty()))
        }
    }

    fn test_adapter() -> FixedCostAdapter {
        let schema = TableSchema::new()
            .column(
                "name",
                ColumnType::new(ColumnKind::Text)
                    .with_filters([FilterClass::Equality])
                    .with_order(Order::Ascending)
                    .exact(),
            )
            .unwrap()
            .column(
                "age",
                ColumnType::new(ColumnKind::Int).with_filters([FilterClass::Range]),
            )
            .unwrap()
            .column(
                "score",
                ColumnType::new(ColumnKind::Float).with_order(Order::Any),
            )
            .unwrap();
        FixedCostAdapter { schema, cost: 17.0 }
    }

    #[test]
    fn test_accepted_constraints_get_argv_slots_in_order() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        let plan = planner
            .plan(
                &[
                    (1, Operator::Gt),
                    (0, Operator::Like), // name only supports equality
                    (0, Operator::Eq),
                ],
                &[],
            )
            .unwrap();

        assert_eq!(
            plan.constraint_usage,
            vec![
                Some(ConstraintUsage {
                    argv_index: 0,
                    omit_check: false,
                }),
                None,
                Some(ConstraintUsage {
                    argv_index: 1,
                    omit_check: true,
                }),
            ]
        );
        assert_eq!(
            plan.token.constraints,
            vec![(1, Operator::Gt), (0, Operator::Eq)]
        );
        assert_eq!(plan.estimated_cost, 17.0);
    }

    #[test]
    fn test_natural_order_match_is_consumed_without_deferral() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        let plan = planner.plan(&[], &[(0, false)]).unwrap();
        assert!(plan.orderby_consumed);
        assert!(plan.token.deferred_order.is_empty());
    }

    #[test]
    fn test_any_order_column_is_deferred() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        let plan = planner.plan(&[], &[(2, true)]).unwrap();
        assert!(plan.orderby_consumed);
        assert_eq!(plan.token.deferred_order, vec![(2, true)]);
    }

    #[test]
    fn test_order_mismatch_stops_the_walk() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        // descending on an ascending column, then a deferrable column
        // that must not be deferred once the walk has stopped
        let plan = planner.plan(&[], &[(0, true), (2, false)]).unwrap();
        assert!(!plan.orderby_consumed);
        assert!(plan.token.deferred_order.is_empty());
    }

    #[test]
    fn test_unordered_column_leaves_sort_to_host() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        let plan = planner.plan(&[], &[(1, false)]).unwrap();
        assert!(!plan.orderby_consumed);
    }

    #[test]
    fn test_unknown_column_index_is_an_error() {
        let adapter = test_adapter();
        let planner = ScanPlanner::new(&adapter);
        assert!(matches!(
            planner.plan(&[(9, Operator::Eq)], &[]),
            Err(PlannerError::UnknownColumn(9))
        ));
    }
}
