//! Local search for improving a single route.
//!
//! - [`two_opt`] — Intra-route 2-opt segment reversal

mod two_opt;

pub use two_opt::{route_cost, two_opt_improve};
