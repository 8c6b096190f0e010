//! Planner Determinism Tests
//!
//! The same constraints, order-bys, and column declarations must
//! always produce the same plan: same token, same order verdict, same
//! cost. The host engine caches plans and replays tokens, so any
//! nondeterminism here corrupts scans downstream.

use std::collections::HashMap;

use fedtable::adapter::{Adapter, AdapterResult, RowStream, ScanOptions};
use fedtable::filters::{Filter, Operator};
use fedtable::planner::ScanPlanner;
use fedtable::schema::{ColumnKind, ColumnType, FilterClass, Order, SortDirection, TableSchema};

// =============================================================================
// Helper Functions
// =============================================================================

struct CountingCostAdapter {
    schema: TableSchema,
}

impl Adapter for CountingCostAdapter {
    fn columns(&self) -> &TableSchema {
        &self.schema
    }

    fn cost(&self, filtered: &[(String, Operator)], order: &[(String, SortDirection)]) -> f64 {
        100.0 + filtered.len() as f64 + 10.0 * order.len() as f64
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

fn adapter() -> CountingCostAdapter {
    let schema = TableSchema::new()
        .column(
            "id",
            ColumnType::new(ColumnKind::Int)
                .with_filters([FilterClass::Range])
                .with_order(Order::Ascending)
                .exact(),
        )
        .unwrap()
        .column(
            "label",
            ColumnType::new(ColumnKind::Text)
                .with_filters([FilterClass::Equality, FilterClass::Like]),
        )
        .unwrap()
        .column(
            "weight",
            ColumnType::new(ColumnKind::Float).with_order(Order::Any),
        )
        .unwrap();
    CountingCostAdapter { schema }
}

// =============================================================================
// Determinism
// =============================================================================

/// Replanning identical input yields an identical plan.
#[test]
fn test_plan_is_deterministic() {
    let adapter = adapter();
    let planner = ScanPlanner::new(&adapter);
    let constraints = [
        (0, Operator::Ge),
        (1, Operator::Like),
        (2, Operator::Eq), // weight declares no filter classes
    ];
    let order_by = [(0, false), (2, true)];

    let first = planner.plan(&constraints, &order_by).unwrap();
    for _ in 0..10 {
        let again = planner.plan(&constraints, &order_by).unwrap();
        assert_eq!(again.constraint_usage, first.constraint_usage);
        assert_eq!(again.token, first.token);
        assert_eq!(again.orderby_consumed, first.orderby_consumed);
        assert_eq!(again.estimated_cost, first.estimated_cost);
        assert_eq!(
            again.token.encode().unwrap(),
            first.token.encode().unwrap()
        );
    }
}

/// The cost call receives exactly the accepted constraints and the
/// deferred order, so the estimate is a pure function of the plan.
#[test]
fn test_cost_reflects_accepted_work_only() {
    let adapter = adapter();
    let planner = ScanPlanner::new(&adapter);

    // one accepted constraint, one rejected, one deferred order-by
    let plan = planner
        .plan(&[(0, Operator::Ge), (2, Operator::Eq)], &[(2, false)])
        .unwrap();
    assert_eq!(plan.estimated_cost, 100.0 + 1.0 + 10.0);
    assert_eq!(plan.token.deferred_order, vec![(2, false)]);
}

/// Argument slots are assigned in constraint order, skipping rejected
/// constraints, every time.
#[test]
fn test_argv_slots_are_stable() {
    let adapter = adapter();
    let planner = ScanPlanner::new(&adapter);
    let plan = planner
        .plan(
            &[(2, Operator::Eq), (0, Operator::Lt), (1, Operator::Eq)],
            &[],
        )
        .unwrap();
    let slots: Vec<Option<usize>> = plan
        .constraint_usage
        .iter()
        .map(|usage| usage.map(|u| u.argv_index))
        .collect();
    assert_eq!(slots, vec![None, Some(0), Some(1)]);
    assert_eq!(
        plan.token.constraints,
        vec![(0, Operator::Lt), (1, Operator::Eq)]
    );
}
