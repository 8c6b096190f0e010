//! Reference cost models for adapters without better estimates.

/// Fixed cost reported by adapters that cannot estimate anything at all.
/// High enough that an adapter with a real model always wins.
pub const DEFAULT_FIXED_COST: f64 = 666.0;

/// Cost model for sources that are scanned sequentially in memory:
/// each pushed-down filter costs one pass over the rows and each sort
/// key costs a comparison sort.
#[derive(Debug, Clone, Copy)]
pub struct SimpleCostModel {
    rows: usize,
    fixed_cost: f64,
}

impl SimpleCostModel {
    pub fn new(rows: usize, fixed_cost: f64) -> Self {
        Self { rows, fixed_cost }
    }

    pub fn estimate(&self, filter_count: usize, sort_key_count: usize) -> f64 {
        let rows = self.rows as f64;
        let mut cost = self.fixed_cost;
        cost += rows * filter_count as f64;
        if self.rows > 1 {
            cost += rows * rows.log2() * sort_key_count as f64;
        }
        cost
    }
}

/// Cost model for sources behind a network hop, where pushing filters
/// down shrinks the payload: each filter is assumed to halve the
/// download on average.
#[derive(Debug, Clone, Copy)]
pub struct NetworkCostModel {
    download_cost: f64,
    fixed_cost: f64,
}

impl NetworkCostModel {
    pub fn new(download_cost: f64, fixed_cost: f64) -> Self {
        Self {
            download_cost,
            fixed_cost,
        }
    }

    pub fn estimate(&self, filter_count: usize) -> f64 {
        self.fixed_cost + self.download_cost / (filter_count as f64 + 1.0)
    }
}
