//! Index-selection planner.
//!
//! The planner runs once per predicate set, before any row is read. It
//! decides which constraints the adapter will evaluate, hands out
//! argument slots for their literals, resolves order-by handling, and
//! packs everything the scan needs into a versioned token that crosses
//! the host engine as an opaque string.
//!
//! # Design Principles
//!
//! - Deterministic: identical input yields an identical plan and token
//! - Acceptance is driven only by the column's declared filter classes
//! - Cost comes from the adapter, never from heuristics in the planner
//! - The token is explicit and versioned; decoding rejects versions it
//!   does not understand

mod cost;
mod errors;
mod planner;
mod token;

pub use cost::{NetworkCostModel, SimpleCostModel, DEFAULT_FIXED_COST};
pub use errors::{PlannerError, PlannerResult};
pub use planner::{ConstraintUsage, PushdownPlan, ScanPlanner, SCAN_INDEX_NUMBER};
pub use token::{IndexToken, TOKEN_VERSION};
