//! Time-window feasibility and the split repair for infeasible routes.

mod feasibility;
mod split;

pub use feasibility::{FeasibilityChecker, TimeWindowViolation, Visit};
pub use split::{split_at_midpoint, split_until_feasible};
