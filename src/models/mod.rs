//! Domain model types for delivery routing.
//!
//! Customers with demands, priorities and time windows, the vehicles of the
//! fleet, route identifiers and the per-route statistics of a run.

mod customer;
mod route;
mod statistics;
mod vehicle;

pub use customer::{Customer, Location, TimeWindow};
pub use route::{RouteId, RouteIdAllocator};
pub use statistics::RouteStatistics;
pub use vehicle::Vehicle;
